//! The [`Grid`]: a registry of named structures.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::counter::GridCounter;
use crate::error::{Result, StoreError};
use crate::kind::StructureKind;
use crate::map::{GridMap, GridMultiMap};
use crate::ringbuffer::GridRingbuffer;
use crate::sequence::{GridList, GridQueue, GridSet};
use crate::topic::GridTopic;

/// Default number of items a ring buffer holds.
pub const DEFAULT_RING_BUFFER_CAPACITY: usize = 10_000;

#[derive(Clone)]
enum Structure {
    Map(Arc<GridMap>),
    Queue(Arc<GridQueue>),
    List(Arc<GridList>),
    Set(Arc<GridSet>),
    MultiMap(Arc<GridMultiMap>),
    Counter(Arc<GridCounter>),
    Topic(Arc<GridTopic>),
    RingBuffer(Arc<GridRingbuffer>),
}

impl Structure {
    fn kind(&self) -> StructureKind {
        match self {
            Structure::Map(_) => StructureKind::Map,
            Structure::Queue(_) => StructureKind::Queue,
            Structure::List(_) => StructureKind::List,
            Structure::Set(_) => StructureKind::Set,
            Structure::MultiMap(_) => StructureKind::MultiMap,
            Structure::Counter(_) => StructureKind::Counter,
            Structure::Topic(_) => StructureKind::Topic,
            Structure::RingBuffer(_) => StructureKind::RingBuffer,
        }
    }
}

/// A thread-safe set of named structures.
///
/// A structure is created the first time its name is used, and its kind is
/// fixed from then on. Asking for the same name as another kind is a
/// [`StoreError::TypeMismatch`].
///
/// # Example
///
/// ```rust
/// use kvgrid_store::Grid;
/// use kvgrid_value::NativeValue;
///
/// let grid = Grid::new("dev");
/// grid.map("users").unwrap().put("alice", NativeValue::json("{\"age\":30}"));
///
/// assert_eq!(grid.map("users").unwrap().size(), 1);
/// assert!(grid.queue("users").is_err());
/// ```
pub struct Grid {
    name: String,
    ring_buffer_capacity: usize,
    structures: Mutex<BTreeMap<String, Structure>>,
}

macro_rules! accessor {
    ($(#[$doc:meta])* $method:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $method(&self, name: &str) -> Result<Arc<$ty>> {
            match self.get_or_create(name, StructureKind::$variant)? {
                Structure::$variant(inner) => Ok(inner),
                other => Err(StoreError::TypeMismatch {
                    name: name.to_string(),
                    expected: StructureKind::$variant,
                    actual: other.kind(),
                }),
            }
        }
    };
}

impl Grid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ring_buffer_capacity: DEFAULT_RING_BUFFER_CAPACITY,
            structures: Mutex::new(BTreeMap::new()),
        }
    }

    /// Capacity for ring buffers created from now on.
    pub fn with_ring_buffer_capacity(mut self, capacity: usize) -> Self {
        self.ring_buffer_capacity = capacity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ring_buffer_capacity(&self) -> usize {
        self.ring_buffer_capacity
    }

    accessor!(map, Map, GridMap);
    accessor!(queue, Queue, GridQueue);
    accessor!(list, List, GridList);
    accessor!(set, Set, GridSet);
    accessor!(multimap, MultiMap, GridMultiMap);
    accessor!(counter, Counter, GridCounter);
    accessor!(topic, Topic, GridTopic);
    accessor!(
        /// Fails with [`StoreError::InvalidArgument`] if the configured
        /// capacity is zero.
        ringbuffer,
        RingBuffer,
        GridRingbuffer
    );

    /// The kind of an existing structure, without creating one.
    pub fn kind_of(&self, name: &str) -> Option<StructureKind> {
        self.structures.lock().unwrap().get(name).map(Structure::kind)
    }

    /// Every structure name with its kind, sorted by name.
    pub fn structures(&self) -> Vec<(String, StructureKind)> {
        self.structures
            .lock()
            .unwrap()
            .iter()
            .map(|(name, s)| (name.clone(), s.kind()))
            .collect()
    }

    /// Remove a structure. Handles already given out keep working but are
    /// no longer reachable by name.
    pub fn destroy(&self, name: &str) -> bool {
        self.structures.lock().unwrap().remove(name).is_some()
    }

    fn get_or_create(&self, name: &str, kind: StructureKind) -> Result<Structure> {
        if name.is_empty() {
            return Err(StoreError::invalid("structure name must not be empty"));
        }

        let mut structures = self.structures.lock().unwrap();
        if let Some(existing) = structures.get(name) {
            return Ok(existing.clone());
        }

        let created = match kind {
            StructureKind::Map => Structure::Map(Arc::default()),
            StructureKind::Queue => Structure::Queue(Arc::default()),
            StructureKind::List => Structure::List(Arc::default()),
            StructureKind::Set => Structure::Set(Arc::default()),
            StructureKind::MultiMap => Structure::MultiMap(Arc::default()),
            StructureKind::Counter => Structure::Counter(Arc::default()),
            StructureKind::Topic => Structure::Topic(Arc::default()),
            StructureKind::RingBuffer => Structure::RingBuffer(Arc::new(GridRingbuffer::new(
                self.ring_buffer_capacity,
            )?)),
        };
        debug!(grid = %self.name, name, %kind, "created structure");
        structures.insert(name.to_string(), created.clone());
        Ok(created)
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("name", &self.name)
            .field("structures", &self.structures())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvgrid_value::NativeValue;

    #[test]
    fn same_name_returns_same_structure() {
        let grid = Grid::new("test");
        grid.map("m").unwrap().put("k", NativeValue::from(1i64));
        assert_eq!(grid.map("m").unwrap().get("k"), Some(NativeValue::from(1i64)));
        assert!(Arc::ptr_eq(&grid.counter("c").unwrap(), &grid.counter("c").unwrap()));
    }

    #[test]
    fn kind_is_fixed_by_first_use() {
        let grid = Grid::new("test");
        grid.queue("jobs").unwrap();

        let err = grid.map("jobs").unwrap_err();
        assert_eq!(
            err,
            StoreError::TypeMismatch {
                name: "jobs".to_string(),
                expected: StructureKind::Map,
                actual: StructureKind::Queue,
            }
        );
        assert_eq!(grid.kind_of("jobs"), Some(StructureKind::Queue));
    }

    #[test]
    fn structures_are_listed_by_name() {
        let grid = Grid::new("test");
        grid.topic("b").unwrap();
        grid.set("a").unwrap();
        assert_eq!(
            grid.structures(),
            vec![
                ("a".to_string(), StructureKind::Set),
                ("b".to_string(), StructureKind::Topic)
            ]
        );

        assert!(grid.destroy("a"));
        assert!(!grid.destroy("a"));
        assert_eq!(grid.kind_of("a"), None);
    }

    #[test]
    fn ring_buffers_use_configured_capacity() {
        let grid = Grid::new("test").with_ring_buffer_capacity(4);
        assert_eq!(grid.ringbuffer("r").unwrap().capacity(), 4);

        let broken = Grid::new("test").with_ring_buffer_capacity(0);
        assert!(matches!(
            broken.ringbuffer("r"),
            Err(StoreError::InvalidArgument(_))
        ));
        assert_eq!(broken.kind_of("r"), None);
    }

    #[test]
    fn empty_names_are_rejected() {
        let grid = Grid::new("test");
        assert!(grid.list("").is_err());
    }
}
