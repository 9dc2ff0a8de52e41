//! Ordered structures: [`GridQueue`], [`GridList`] and [`GridSet`].

use std::collections::VecDeque;
use std::sync::Mutex;

use kvgrid_value::NativeValue;

use crate::error::{Result, StoreError};

/// A FIFO queue.
#[derive(Debug, Default)]
pub struct GridQueue {
    items: Mutex<VecDeque<NativeValue>>,
}

impl GridQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail. The queue is unbounded, so this always succeeds.
    pub fn offer(&self, value: NativeValue) -> bool {
        self.items.lock().unwrap().push_back(value);
        true
    }

    /// Remove and return the head.
    pub fn poll(&self) -> Option<NativeValue> {
        self.items.lock().unwrap().pop_front()
    }

    pub fn peek(&self) -> Option<NativeValue> {
        self.items.lock().unwrap().front().cloned()
    }

    pub fn size(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.items.lock().unwrap().clear();
    }

    /// Remove up to `max` items from the head.
    pub fn drain(&self, max: usize) -> Vec<NativeValue> {
        let mut items = self.items.lock().unwrap();
        let count = max.min(items.len());
        items.drain(..count).collect()
    }
}

/// An indexed list.
#[derive(Debug, Default)]
pub struct GridList {
    items: Mutex<Vec<NativeValue>>,
}

impl GridList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, value: NativeValue) {
        self.items.lock().unwrap().push(value);
    }

    /// Insert at `index`, shifting later items. `index == size` appends.
    pub fn add_at(&self, index: usize, value: NativeValue) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        if index > items.len() {
            return Err(StoreError::IndexOutOfBounds {
                index,
                size: items.len(),
            });
        }
        items.insert(index, value);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<NativeValue> {
        let items = self.items.lock().unwrap();
        items.get(index).cloned().ok_or(StoreError::IndexOutOfBounds {
            index,
            size: items.len(),
        })
    }

    /// Replace the item at `index`, returning the old one.
    pub fn set(&self, index: usize, value: NativeValue) -> Result<NativeValue> {
        let mut items = self.items.lock().unwrap();
        let size = items.len();
        match items.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(StoreError::IndexOutOfBounds { index, size }),
        }
    }

    pub fn remove_at(&self, index: usize) -> Result<NativeValue> {
        let mut items = self.items.lock().unwrap();
        if index >= items.len() {
            return Err(StoreError::IndexOutOfBounds {
                index,
                size: items.len(),
            });
        }
        Ok(items.remove(index))
    }

    pub fn size(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.items.lock().unwrap().clear();
    }

    pub fn all(&self) -> Vec<NativeValue> {
        self.items.lock().unwrap().clone()
    }
}

/// A set of distinct values, kept in insertion order.
///
/// Store values are not hashable, so membership is by equality.
#[derive(Debug, Default)]
pub struct GridSet {
    items: Mutex<Vec<NativeValue>>,
}

impl GridSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if an equal value is already present.
    pub fn add(&self, value: NativeValue) -> bool {
        let mut items = self.items.lock().unwrap();
        if items.contains(&value) {
            return false;
        }
        items.push(value);
        true
    }

    pub fn remove(&self, value: &NativeValue) -> bool {
        let mut items = self.items.lock().unwrap();
        match items.iter().position(|v| v == value) {
            Some(position) => {
                items.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &NativeValue) -> bool {
        self.items.lock().unwrap().contains(value)
    }

    pub fn size(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<NativeValue> {
        self.items.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.items.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: i64) -> NativeValue {
        NativeValue::from(i)
    }

    #[test]
    fn queue_is_fifo() {
        let queue = GridQueue::new();
        assert!(queue.offer(n(1)));
        queue.offer(n(2));
        queue.offer(n(3));

        assert_eq!(queue.peek(), Some(n(1)));
        assert_eq!(queue.poll(), Some(n(1)));
        assert_eq!(queue.drain(10), vec![n(2), n(3)]);
        assert_eq!(queue.poll(), None);
    }

    #[test]
    fn queue_drain_respects_max() {
        let queue = GridQueue::new();
        for i in 0..5 {
            queue.offer(n(i));
        }
        assert_eq!(queue.drain(2), vec![n(0), n(1)]);
        assert_eq!(queue.size(), 3);
        queue.clear();
        assert_eq!(queue.size(), 0);
    }

    #[test]
    fn list_indexing() {
        let list = GridList::new();
        list.add(n(1));
        list.add(n(3));
        list.add_at(1, n(2)).unwrap();
        assert_eq!(list.all(), vec![n(1), n(2), n(3)]);

        assert_eq!(list.set(0, n(10)).unwrap(), n(1));
        assert_eq!(list.get(0).unwrap(), n(10));
        assert_eq!(list.remove_at(2).unwrap(), n(3));
        assert_eq!(list.size(), 2);
    }

    #[test]
    fn list_bounds_are_checked() {
        let list = GridList::new();
        list.add(n(1));

        assert_eq!(
            list.get(1),
            Err(StoreError::IndexOutOfBounds { index: 1, size: 1 })
        );
        assert!(list.add_at(2, n(0)).is_err());
        assert!(list.set(5, n(0)).is_err());
        assert!(list.remove_at(1).is_err());
        // appending at size is allowed
        list.add_at(1, n(2)).unwrap();
    }

    #[test]
    fn set_keeps_distinct_values() {
        let set = GridSet::new();
        assert!(set.add(NativeValue::json("\"a\"")));
        assert!(!set.add(NativeValue::json("\"a\"")));
        assert!(set.add(NativeValue::json("\"b\"")));
        assert_eq!(set.size(), 2);

        assert!(set.contains(&NativeValue::json("\"b\"")));
        assert!(set.remove(&NativeValue::json("\"a\"")));
        assert!(!set.remove(&NativeValue::json("\"a\"")));
        assert_eq!(set.all(), vec![NativeValue::json("\"b\"")]);
    }
}
