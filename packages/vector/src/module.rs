//! Publishes the collection API as named types.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kvgrid_capability::{
    arg, arity, object, receiver, CallFuture, InvokeError, Module, Object, TypeHandle,
    SEARCH_OPTIONS_TYPE, SEARCH_RESULT_TYPE, VECTOR_COLLECTION_TYPE, VECTOR_DOCUMENT_TYPE,
    VECTOR_VALUES_TYPE,
};
use kvgrid_store::Grid;
use kvgrid_value::NativeValue;
use tracing::debug;

use crate::collection::{
    SearchOptions, SearchOptionsBuilder, SearchResult, VectorCollection, VectorDocument,
    VectorValues,
};
use crate::error::VectorError;

type Collections = Arc<Mutex<HashMap<(String, String), Arc<VectorCollection>>>>;

/// The vector module.
///
/// Collections belong to a grid instance and are created on first use.
/// Install it into a registry to make vector collections available:
///
/// ```rust
/// use kvgrid_capability::{ModuleLoader, ModuleRegistry, VECTOR_COLLECTION_TYPE};
/// use kvgrid_vector::VectorModule;
///
/// let registry = ModuleRegistry::new();
/// registry.install(&VectorModule::new());
/// assert!(registry.load_type(VECTOR_COLLECTION_TYPE).is_some());
/// ```
#[derive(Default, Clone)]
pub struct VectorModule {
    collections: Collections,
}

impl VectorModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collection `name` on `grid`, created if needed.
    pub fn collection(&self, grid: &Grid, name: &str) -> Arc<VectorCollection> {
        let mut collections = self.collections.lock().unwrap();
        let key = (grid.name().to_string(), name.to_string());
        Arc::clone(collections.entry(key).or_insert_with(|| {
            debug!(grid = grid.name(), collection = name, "created vector collection");
            Arc::new(VectorCollection::new(name))
        }))
    }

    fn collection_type(&self) -> TypeHandle {
        let module = self.clone();
        TypeHandle::builder(VECTOR_COLLECTION_TYPE)
            .constructor("collection", move |args| {
                arity(args, 2)?;
                let grid = arg::<Arc<Grid>>(args, 0)?;
                let name = arg::<String>(args, 1)?;
                Ok(object(module.collection(grid, name)))
            })
            .async_method("search", |this, args| ready(search(this, args)))
            .async_method("put", |this, args| ready(put(this, args)))
            .async_method("get", |this, args| ready(get(this, args)))
            .async_method("delete", |this, args| ready(delete(this, args)))
            .build()
    }
}

impl Module for VectorModule {
    fn name(&self) -> &str {
        concat!("kvgrid-vector ", env!("CARGO_PKG_VERSION"))
    }

    fn types(&self) -> Vec<TypeHandle> {
        vec![
            self.collection_type(),
            values_type(),
            document_type(),
            options_type(),
            result_type(),
        ]
    }
}

fn search(this: &Object, args: &[Object]) -> Result<Object, InvokeError> {
    arity(args, 2)?;
    let collection = receiver::<Arc<VectorCollection>>(this)?;
    let query = arg::<VectorValues>(args, 0)?;
    let options = arg::<SearchOptions>(args, 1)?;
    let results = collection.search(query, options).map_err(failed)?;
    Ok(object(
        results.into_iter().map(object).collect::<Vec<Object>>(),
    ))
}

/// Resolves to the replaced document, if any.
fn put(this: &Object, args: &[Object]) -> Result<Object, InvokeError> {
    arity(args, 2)?;
    let collection = receiver::<Arc<VectorCollection>>(this)?;
    let key = key_arg(args)?;
    let document = arg::<VectorDocument>(args, 1)?.clone();
    let previous = collection.put(&key, document).map_err(failed)?;
    Ok(object(previous.map(object)))
}

fn get(this: &Object, args: &[Object]) -> Result<Object, InvokeError> {
    arity(args, 1)?;
    let collection = receiver::<Arc<VectorCollection>>(this)?;
    let found = collection.get(&key_arg(args)?);
    Ok(object(found.map(object)))
}

fn delete(this: &Object, args: &[Object]) -> Result<Object, InvokeError> {
    arity(args, 1)?;
    let collection = receiver::<Arc<VectorCollection>>(this)?;
    collection.delete(&key_arg(args)?);
    Ok(object(()))
}

fn values_type() -> TypeHandle {
    TypeHandle::builder(VECTOR_VALUES_TYPE)
        .constructor("of", |args| {
            arity(args, 1)?;
            Ok(object(VectorValues::of(arg::<Vec<f32>>(args, 0)?.clone())))
        })
        .build()
}

fn document_type() -> TypeHandle {
    TypeHandle::builder(VECTOR_DOCUMENT_TYPE)
        .constructor("of", |args| {
            arity(args, 2)?;
            let value = arg::<NativeValue>(args, 0)?.clone();
            let vector = arg::<VectorValues>(args, 1)?.clone();
            Ok(object(VectorDocument::of(value, vector)))
        })
        .method("value", |this, _| {
            Ok(object(receiver::<VectorDocument>(this)?.value.clone()))
        })
        .method("vector", |this, _| {
            Ok(object(receiver::<VectorDocument>(this)?.vector.0.clone()))
        })
        .build()
}

fn options_type() -> TypeHandle {
    fn step(
        this: &Object,
        f: impl FnOnce(SearchOptionsBuilder) -> SearchOptionsBuilder,
    ) -> Result<Object, InvokeError> {
        Ok(object(f(*receiver::<SearchOptionsBuilder>(this)?)))
    }

    TypeHandle::builder(SEARCH_OPTIONS_TYPE)
        .constructor("builder", |_| Ok(object(SearchOptions::builder())))
        .method("limit", |this, args| {
            let limit = *arg::<usize>(args, 0)?;
            step(this, |b| b.limit(limit))
        })
        .method("include_value", |this, _| step(this, |b| b.include_value()))
        .method("include_vectors", |this, _| step(this, |b| b.include_vectors()))
        .method("build", |this, _| {
            Ok(object(receiver::<SearchOptionsBuilder>(this)?.build()))
        })
        .build()
}

fn result_type() -> TypeHandle {
    TypeHandle::builder(SEARCH_RESULT_TYPE)
        .method("key", |this, _| {
            Ok(object(receiver::<SearchResult>(this)?.key.clone()))
        })
        .method("score", |this, _| {
            Ok(object(receiver::<SearchResult>(this)?.score))
        })
        .method("value", |this, _| {
            Ok(object(receiver::<SearchResult>(this)?.value.clone()))
        })
        .method("vector", |this, _| {
            Ok(object(receiver::<SearchResult>(this)?.vector.clone()))
        })
        .build()
}

/// Collection keys arrive as store values; only strings are accepted.
fn key_arg(args: &[Object]) -> Result<String, InvokeError> {
    match arg::<NativeValue>(args, 0)? {
        NativeValue::Str(key) => Ok(key.clone()),
        other => Err(failed(VectorError::InvalidKey(format!(
            "expected a string key, got {}",
            other.type_name()
        )))),
    }
}

fn failed(err: VectorError) -> InvokeError {
    InvokeError::failed(err.to_string())
}

/// Collections are in memory, so every call completes immediately.
fn ready(result: Result<Object, InvokeError>) -> CallFuture {
    Box::pin(std::future::ready(result))
}
