//! Key/value structures: [`GridMap`] and [`GridMultiMap`].

use std::collections::BTreeMap;
use std::sync::Mutex;

use kvgrid_value::NativeValue;

/// A named key/value map. Keys iterate in sorted order.
#[derive(Debug, Default)]
pub struct GridMap {
    entries: Mutex<BTreeMap<String, NativeValue>>,
}

impl GridMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn put(&self, key: impl Into<String>, value: NativeValue) -> Option<NativeValue> {
        self.entries.lock().unwrap().insert(key.into(), value)
    }

    /// Store `value` only if `key` is absent. Returns the existing value
    /// when there is one.
    pub fn put_if_absent(&self, key: impl Into<String>, value: NativeValue) -> Option<NativeValue> {
        let mut entries = self.entries.lock().unwrap();
        let key = key.into();
        if let Some(existing) = entries.get(&key) {
            return Some(existing.clone());
        }
        entries.insert(key, value);
        None
    }

    pub fn get(&self, key: &str) -> Option<NativeValue> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<NativeValue> {
        self.entries.lock().unwrap().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn size(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<NativeValue> {
        self.entries.lock().unwrap().values().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(String, NativeValue)> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// A map from a key to a set of values.
///
/// A value appears at most once per key. Keys with no values are removed.
#[derive(Debug, Default)]
pub struct GridMultiMap {
    entries: Mutex<BTreeMap<String, Vec<NativeValue>>>,
}

impl GridMultiMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under `key`. Returns false if it was already there.
    pub fn put(&self, key: impl Into<String>, value: NativeValue) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let values = entries.entry(key.into()).or_default();
        if values.contains(&value) {
            return false;
        }
        values.push(value);
        true
    }

    /// All values under `key`, in insertion order.
    pub fn get(&self, key: &str) -> Vec<NativeValue> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove one key/value pair. Returns true if it existed.
    pub fn remove_entry(&self, key: &str, value: &NativeValue) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let Some(values) = entries.get_mut(key) else {
            return false;
        };
        let Some(position) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(position);
        if values.is_empty() {
            entries.remove(key);
        }
        true
    }

    /// Remove every value under `key`, returning them.
    pub fn remove_all(&self, key: &str) -> Vec<NativeValue> {
        self.entries.lock().unwrap().remove(key).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    /// Total number of key/value pairs.
    pub fn size(&self) -> usize {
        self.entries.lock().unwrap().values().map(Vec::len).sum()
    }

    pub fn value_count(&self, key: &str) -> usize {
        self.entries.lock().unwrap().get(key).map_or(0, Vec::len)
    }
}
