//! kvgrid Store
//!
//! An in-process store of named distributed-style structures. Keys are
//! strings and values are [`NativeValue`]s, exactly as a remote store would
//! hand them back.
//!
//! | Structure | Type |
//! |-----------|------|
//! | map | [`GridMap`] |
//! | queue | [`GridQueue`] |
//! | list | [`GridList`] |
//! | set | [`GridSet`] |
//! | multimap | [`GridMultiMap`] |
//! | counter | [`GridCounter`] |
//! | topic | [`GridTopic`] |
//! | ring buffer | [`GridRingbuffer`] |

mod counter;
mod error;
mod grid;
mod kind;
mod map;
mod ringbuffer;
mod sequence;
mod topic;

pub use counter::GridCounter;
pub use error::{Result, StoreError};
pub use grid::{Grid, DEFAULT_RING_BUFFER_CAPACITY};
pub use kind::StructureKind;
pub use map::{GridMap, GridMultiMap};
pub use ringbuffer::GridRingbuffer;
pub use sequence::{GridList, GridQueue, GridSet};
pub use topic::GridTopic;

pub use kvgrid_value::NativeValue;
