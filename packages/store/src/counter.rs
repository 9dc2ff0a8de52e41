use std::sync::atomic::{AtomicI64, Ordering};

/// A named 64-bit counter. Arithmetic wraps on overflow.
#[derive(Debug, Default)]
pub struct GridCounter {
    value: AtomicI64,
}

impl GridCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::SeqCst);
    }

    pub fn add_and_get(&self, delta: i64) -> i64 {
        self.value.fetch_add(delta, Ordering::SeqCst).wrapping_add(delta)
    }

    pub fn increment_and_get(&self) -> i64 {
        self.add_and_get(1)
    }

    pub fn decrement_and_get(&self) -> i64 {
        self.add_and_get(-1)
    }

    /// Set to `update` if the current value is `expected`.
    pub fn compare_and_set(&self, expected: i64, update: i64) -> bool {
        self.value
            .compare_exchange(expected, update, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
