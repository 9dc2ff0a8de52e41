//! kvgrid Vector Collections
//!
//! An optional module providing named collections of vector documents with
//! brute-force cosine similarity search. Nothing links against this crate's
//! types directly: install [`VectorModule`] into a
//! [`ModuleRegistry`](kvgrid_capability::ModuleRegistry) and the server
//! reaches it through the registered type names.

mod collection;
mod distance;
mod error;
mod module;

pub use collection::{
    SearchOptions, SearchOptionsBuilder, SearchResult, VectorCollection, VectorDocument,
    VectorValues,
};
pub use distance::cosine_similarity;
pub use error::{Result, VectorError};
pub use module::VectorModule;
