use std::collections::VecDeque;
use std::sync::Mutex;

use kvgrid_value::NativeValue;

use crate::error::{Result, StoreError};

/// A fixed-capacity buffer addressed by sequence number.
///
/// Sequences start at 0 and grow by one per item. Once full, each add
/// overwrites the oldest item. An empty buffer has head 0 and tail -1.
#[derive(Debug)]
pub struct GridRingbuffer {
    capacity: usize,
    state: Mutex<RingState>,
}

#[derive(Debug, Default)]
struct RingState {
    items: VecDeque<NativeValue>,
    head: i64,
}

impl RingState {
    fn tail(&self) -> i64 {
        self.head + self.items.len() as i64 - 1
    }
}

impl GridRingbuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(StoreError::invalid("ring buffer capacity must be positive"));
        }
        Ok(Self {
            capacity,
            state: Mutex::new(RingState::default()),
        })
    }

    /// Append `value`, returning its sequence.
    pub fn add(&self, value: NativeValue) -> i64 {
        let mut state = self.state.lock().unwrap();
        if state.items.len() == self.capacity {
            state.items.pop_front();
            state.head += 1;
        }
        state.items.push_back(value);
        state.tail()
    }

    pub fn read_one(&self, sequence: i64) -> Result<NativeValue> {
        let state = self.state.lock().unwrap();
        Self::check_start(&state, sequence)?;
        if sequence > state.tail() {
            return Err(StoreError::invalid(format!(
                "sequence {} is beyond the tail {}",
                sequence,
                state.tail()
            )));
        }
        Ok(state.items[(sequence - state.head) as usize].clone())
    }

    /// Read up to `max` items starting at `start`. Reading past the tail
    /// returns fewer items, or none.
    pub fn read_many(&self, start: i64, max: usize) -> Result<Vec<NativeValue>> {
        let state = self.state.lock().unwrap();
        Self::check_start(&state, start)?;
        let offset = (start - state.head) as usize;
        Ok(state.items.iter().skip(offset).take(max).cloned().collect())
    }

    fn check_start(state: &RingState, sequence: i64) -> Result<()> {
        if sequence < 0 {
            return Err(StoreError::invalid(format!(
                "sequence must not be negative, got {}",
                sequence
            )));
        }
        if sequence < state.head {
            return Err(StoreError::StaleSequence {
                sequence,
                head: state.head,
            });
        }
        Ok(())
    }

    pub fn head_sequence(&self) -> i64 {
        self.state.lock().unwrap().head
    }

    pub fn tail_sequence(&self) -> i64 {
        self.state.lock().unwrap().tail()
    }

    pub fn size(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: i64) -> NativeValue {
        NativeValue::from(i)
    }

    #[test]
    fn empty_buffer_sequences() {
        let ring = GridRingbuffer::new(3).unwrap();
        assert_eq!(ring.head_sequence(), 0);
        assert_eq!(ring.tail_sequence(), -1);
        assert!(ring.read_many(0, 10).unwrap().is_empty());
        assert!(ring.read_one(0).is_err());
    }

    #[test]
    fn overwrites_oldest_when_full() {
        let ring = GridRingbuffer::new(3).unwrap();
        for i in 0..5 {
            assert_eq!(ring.add(n(i)), i);
        }

        assert_eq!(ring.size(), 3);
        assert_eq!(ring.head_sequence(), 2);
        assert_eq!(ring.tail_sequence(), 4);
        assert_eq!(ring.read_one(3).unwrap(), n(3));
        assert_eq!(ring.read_many(2, 2).unwrap(), vec![n(2), n(3)]);
        assert_eq!(ring.read_many(4, 10).unwrap(), vec![n(4)]);
    }

    #[test]
    fn stale_reads_are_reported() {
        let ring = GridRingbuffer::new(2).unwrap();
        for i in 0..4 {
            ring.add(n(i));
        }
        assert_eq!(
            ring.read_one(1),
            Err(StoreError::StaleSequence {
                sequence: 1,
                head: 2
            })
        );
        assert!(matches!(
            ring.read_many(0, 1),
            Err(StoreError::StaleSequence { .. })
        ));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(GridRingbuffer::new(0).is_err());
    }
}
