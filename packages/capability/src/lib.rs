//! kvgrid Capabilities
//!
//! Optional modules register named types with a [`ModuleRegistry`]. The
//! server probes for them once at start-up and talks to them through a
//! capability trait, falling back to a stub that reports the capability as
//! unavailable when the module is not installed.
//!
//! ```rust
//! use kvgrid_bridge::ValueBridge;
//! use kvgrid_capability::{detect, object, ModuleRegistry, SearchRequest};
//!
//! // Nothing installed: every vector call reports unavailable.
//! let registry = ModuleRegistry::new();
//! let vectors = detect(&registry, object(()), ValueBridge::json());
//!
//! let outcome = vectors
//!     .search(&SearchRequest::new("docs", vec![1.0, 2.0, 3.0], 5))
//!     .unwrap();
//! assert!(outcome.is_unavailable());
//! ```

mod adapter;
mod error;
mod module;

pub use adapter::{
    detect, BoundAdapter, Outcome, SearchHit, SearchRequest, StubAdapter, Unavailable,
    VectorCapability, SEARCH_OPTIONS_TYPE, SEARCH_RESULT_TYPE, UNAVAILABLE_MESSAGE,
    VECTOR_COLLECTION_TYPE, VECTOR_DOCUMENT_TYPE, VECTOR_VALUES_TYPE,
};
pub use error::CapabilityError;
pub use module::{
    arg, arity, object, receiver, AsyncMethodFn, CallFuture, ConstructorFn, InvokeError,
    LookupError, Member, MethodFn, Module, ModuleLoader, ModuleRegistry, Object, TypeHandle,
    TypeHandleBuilder,
};
