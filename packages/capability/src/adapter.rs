//! The vector capability and its two adapters.
//!
//! Vector collections live in an optional module. At start-up [`detect`]
//! asks the module loader once for the module's marker type:
//!
//! - found: a [`BoundAdapter`] caches the type handles and calls the module
//!   through them for the rest of the process
//! - not found: a [`StubAdapter`] answers every call with [`Outcome::Unavailable`]
//!   and never consults the loader again
//!
//! Callers only see [`VectorCapability`], so they cannot tell which one they
//! hold except by the outcome of a call.

use std::any::{type_name, Any};
use std::sync::Arc;

use kvgrid_bridge::ValueBridge;
use kvgrid_value::{NativeValue, Value};
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, info, warn};

use crate::error::CapabilityError;
use crate::module::{object, CallFuture, ModuleLoader, Object, TypeHandle};

/// Marker type whose presence means the vector module is installed.
pub const VECTOR_COLLECTION_TYPE: &str = "kvgrid.vector.VectorCollection";
/// Wrapper for query and document vectors.
pub const VECTOR_VALUES_TYPE: &str = "kvgrid.vector.VectorValues";
/// Value + vector pair stored in a collection.
pub const VECTOR_DOCUMENT_TYPE: &str = "kvgrid.vector.VectorDocument";
/// Builder-style search options.
pub const SEARCH_OPTIONS_TYPE: &str = "kvgrid.vector.SearchOptions";
/// One ranked search result.
pub const SEARCH_RESULT_TYPE: &str = "kvgrid.vector.SearchResult";

/// What callers are told when the module is not installed.
pub const UNAVAILABLE_MESSAGE: &str = "Vector collections are not available: the kvgrid-vector \
     module (0.1 or later) is not installed in this server. Rebuild kvgrid-server with the \
     `vector` feature and make sure `vector.enabled` is not set to false in the configuration.";

/// A capability call that could not run because the capability is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    pub operation: &'static str,
    pub message: String,
}

/// Result of a capability call that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    Unavailable(Unavailable),
}

impl<T> Outcome<T> {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Outcome::Unavailable(_))
    }

    /// The result, if the call ran.
    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Unavailable(_) => None,
        }
    }
}

/// Parameters of a similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub collection: String,
    pub vector: Vec<f32>,
    pub top_k: usize,
    pub include_value: bool,
    pub include_vectors: bool,
}

impl SearchRequest {
    /// A request returning values but not vectors.
    pub fn new(collection: impl Into<String>, vector: Vec<f32>, top_k: usize) -> Self {
        Self {
            collection: collection.into(),
            vector,
            top_k,
            include_value: true,
            include_vectors: false,
        }
    }

    pub fn include_value(mut self, include: bool) -> Self {
        self.include_value = include;
        self
    }

    pub fn include_vectors(mut self, include: bool) -> Self {
        self.include_vectors = include;
        self
    }
}

/// One ranked result. Fields the module could not provide are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHit {
    pub key: Option<Value>,
    pub score: Option<f32>,
    pub value: Option<Value>,
    pub vector: Option<Vec<f32>>,
}

/// Vector collection operations.
///
/// All calls block until the underlying operation completes.
///
/// # Errors
///
/// Calling a bound capability from a thread that is already running a tokio
/// runtime fails with [`CapabilityError::NestedRuntime`]. Use
/// `spawn_blocking` or a plain thread from async code.
pub trait VectorCapability: Send + Sync {
    fn search(&self, request: &SearchRequest) -> Result<Outcome<Vec<SearchHit>>, CapabilityError>;

    fn put(
        &self,
        collection: &str,
        key: &str,
        value: &Value,
        vector: &[f32],
    ) -> Result<Outcome<()>, CapabilityError>;

    /// `Done(None)` means the key is not in the collection.
    fn get(&self, collection: &str, key: &str) -> Result<Outcome<Option<Value>>, CapabilityError>;

    fn delete(&self, collection: &str, key: &str) -> Result<Outcome<()>, CapabilityError>;
}

/// Probe the loader once and return the matching adapter.
///
/// `instance` is the store handle passed to the module when opening
/// collections.
pub fn detect(
    loader: &dyn ModuleLoader,
    instance: Object,
    bridge: ValueBridge,
) -> Arc<dyn VectorCapability> {
    match BoundAdapter::bind(loader, instance, bridge) {
        Ok(Some(adapter)) => {
            info!(marker = VECTOR_COLLECTION_TYPE, "vector module found, vector tools enabled");
            Arc::new(adapter)
        }
        Ok(None) => {
            info!(
                marker = VECTOR_COLLECTION_TYPE,
                "vector module not installed, vector tools will report unavailable"
            );
            Arc::new(StubAdapter::new())
        }
        Err(e) => {
            warn!(error = %e, "vector module found but could not be bound");
            Arc::new(StubAdapter::with_message(format!(
                "{} Cause: {}",
                UNAVAILABLE_MESSAGE, e
            )))
        }
    }
}

/// Adapter used when the vector module is absent.
#[derive(Debug, Clone)]
pub struct StubAdapter {
    message: String,
}

impl StubAdapter {
    pub fn new() -> Self {
        Self::with_message(UNAVAILABLE_MESSAGE)
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn unavailable<T>(&self, operation: &'static str) -> Result<Outcome<T>, CapabilityError> {
        Ok(Outcome::Unavailable(Unavailable {
            operation,
            message: self.message.clone(),
        }))
    }
}

impl Default for StubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorCapability for StubAdapter {
    fn search(&self, _request: &SearchRequest) -> Result<Outcome<Vec<SearchHit>>, CapabilityError> {
        self.unavailable("search")
    }

    fn put(
        &self,
        _collection: &str,
        _key: &str,
        _value: &Value,
        _vector: &[f32],
    ) -> Result<Outcome<()>, CapabilityError> {
        self.unavailable("put")
    }

    fn get(&self, _collection: &str, _key: &str) -> Result<Outcome<Option<Value>>, CapabilityError> {
        self.unavailable("get")
    }

    fn delete(&self, _collection: &str, _key: &str) -> Result<Outcome<()>, CapabilityError> {
        self.unavailable("delete")
    }
}

/// Adapter bound to an installed vector module.
///
/// Type handles are resolved once in [`bind`](Self::bind). Members are looked
/// up on the cached handles per call, so a module that lacks one surfaces as
/// a [`CapabilityError::Binding`] for that operation only.
///
/// The adapter owns a current-thread runtime and blocks on it. Calls made
/// inside another runtime are refused with [`CapabilityError::NestedRuntime`],
/// and the adapter must be dropped outside one.
pub struct BoundAdapter {
    instance: Object,
    bridge: ValueBridge,
    collection_type: Arc<TypeHandle>,
    vector_values_type: Option<Arc<TypeHandle>>,
    document_type: Option<Arc<TypeHandle>>,
    options_type: Option<Arc<TypeHandle>>,
    result_type: Option<Arc<TypeHandle>>,
    runtime: Runtime,
}

impl BoundAdapter {
    /// Resolve the module's types. Returns `Ok(None)` when the marker type
    /// is not installed.
    pub fn bind(
        loader: &dyn ModuleLoader,
        instance: Object,
        bridge: ValueBridge,
    ) -> Result<Option<Self>, CapabilityError> {
        let Some(collection_type) = loader.load_type(VECTOR_COLLECTION_TYPE) else {
            return Ok(None);
        };

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CapabilityError::Runtime(e.to_string()))?;

        Ok(Some(Self {
            instance,
            bridge,
            collection_type,
            vector_values_type: loader.load_type(VECTOR_VALUES_TYPE),
            document_type: loader.load_type(VECTOR_DOCUMENT_TYPE),
            options_type: loader.load_type(SEARCH_OPTIONS_TYPE),
            result_type: loader.load_type(SEARCH_RESULT_TYPE),
            runtime,
        }))
    }

    fn supporting<'a>(
        &self,
        operation: &'static str,
        handle: &'a Option<Arc<TypeHandle>>,
        name: &str,
    ) -> Result<&'a TypeHandle, CapabilityError> {
        handle
            .as_deref()
            .ok_or_else(|| CapabilityError::missing_type(operation, name))
    }

    fn wait(&self, operation: &'static str, call: CallFuture) -> Result<Object, CapabilityError> {
        if Handle::try_current().is_ok() {
            return Err(CapabilityError::NestedRuntime { operation });
        }
        self.runtime
            .block_on(call)
            .map_err(|e| CapabilityError::invocation(operation, e))
    }

    fn open_collection(&self, operation: &'static str, name: &str) -> Result<Object, CapabilityError> {
        let open = self
            .collection_type
            .constructor("collection")
            .map_err(|e| CapabilityError::binding(operation, e))?;
        open(&[self.instance.clone(), object(name.to_string())])
            .map_err(|e| CapabilityError::invocation(operation, e))
    }

    fn call_async(
        &self,
        operation: &'static str,
        collection: &Object,
        args: &[Object],
    ) -> Result<Object, CapabilityError> {
        let method = self
            .collection_type
            .async_method(operation)
            .map_err(|e| CapabilityError::binding(operation, e))?;
        self.wait(operation, method(collection, args))
    }

    fn wrap_vector(&self, operation: &'static str, vector: &[f32]) -> Result<Object, CapabilityError> {
        let values = self.supporting(operation, &self.vector_values_type, VECTOR_VALUES_TYPE)?;
        let of = values
            .constructor("of")
            .map_err(|e| CapabilityError::binding(operation, e))?;
        of(&[object(vector.to_vec())]).map_err(|e| CapabilityError::invocation(operation, e))
    }

    fn search_options(&self, request: &SearchRequest) -> Result<Object, CapabilityError> {
        const OP: &str = "search";
        let options = self.supporting(OP, &self.options_type, SEARCH_OPTIONS_TYPE)?;
        let call = |builder: &Object, name: &str, args: &[Object]| -> Result<Object, CapabilityError> {
            let method = options
                .method(name)
                .map_err(|e| CapabilityError::binding(OP, e))?;
            method(builder, args).map_err(|e| CapabilityError::invocation(OP, e))
        };

        let new_builder = options
            .constructor("builder")
            .map_err(|e| CapabilityError::binding(OP, e))?;
        let mut builder = new_builder(&[]).map_err(|e| CapabilityError::invocation(OP, e))?;
        builder = call(&builder, "limit", &[object(request.top_k)])?;
        if request.include_value {
            builder = call(&builder, "include_value", &[])?;
        }
        if request.include_vectors {
            builder = call(&builder, "include_vectors", &[])?;
        }
        call(&builder, "build", &[])
    }

    fn hit(&self, result_type: &TypeHandle, item: &Object) -> SearchHit {
        SearchHit {
            key: read_getter::<NativeValue>(result_type, item, "key")
                .map(|key| self.bridge.decode(&key)),
            score: read_getter::<f32>(result_type, item, "score"),
            value: read_getter::<Option<NativeValue>>(result_type, item, "value")
                .flatten()
                .map(|value| self.bridge.decode(&value)),
            vector: read_getter::<Option<Vec<f32>>>(result_type, item, "vector").flatten(),
        }
    }
}

/// Read one field of a result object. Any failure drops just that field.
fn read_getter<T: Any + Clone>(handle: &TypeHandle, item: &Object, getter: &str) -> Option<T> {
    let read = handle
        .method(getter)
        .map_err(|e| e.to_string())
        .and_then(|method| method(item, &[]).map_err(|e| e.to_string()))
        .and_then(|value| {
            value
                .downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| format!("expected {}", type_name::<T>()))
        });
    match read {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(getter, error = %e, "omitting unreadable search result field");
            None
        }
    }
}

fn key_object(key: &str) -> Object {
    object(NativeValue::from(key))
}

impl VectorCapability for BoundAdapter {
    fn search(&self, request: &SearchRequest) -> Result<Outcome<Vec<SearchHit>>, CapabilityError> {
        const OP: &str = "search";
        let result_type = self.supporting(OP, &self.result_type, SEARCH_RESULT_TYPE)?;
        let options = self.search_options(request)?;
        let query = self.wrap_vector(OP, &request.vector)?;
        let collection = self.open_collection(OP, &request.collection)?;

        let results = self.call_async(OP, &collection, &[query, options])?;
        let items = results
            .downcast_ref::<Vec<Object>>()
            .ok_or_else(|| CapabilityError::unexpected(OP, "module returned results in an unknown form"))?;

        Ok(Outcome::Done(
            items.iter().map(|item| self.hit(result_type, item)).collect(),
        ))
    }

    fn put(
        &self,
        collection: &str,
        key: &str,
        value: &Value,
        vector: &[f32],
    ) -> Result<Outcome<()>, CapabilityError> {
        const OP: &str = "put";
        let document_type = self.supporting(OP, &self.document_type, VECTOR_DOCUMENT_TYPE)?;
        let native = self
            .bridge
            .encode(value)
            .map_err(|source| CapabilityError::Encode { operation: OP, source })?;
        let vector = self.wrap_vector(OP, vector)?;
        let new_document = document_type
            .constructor("of")
            .map_err(|e| CapabilityError::binding(OP, e))?;
        let document = new_document(&[object(native), vector])
            .map_err(|e| CapabilityError::invocation(OP, e))?;

        let collection = self.open_collection(OP, collection)?;
        self.call_async(OP, &collection, &[key_object(key), document])?;
        Ok(Outcome::Done(()))
    }

    fn get(&self, collection: &str, key: &str) -> Result<Outcome<Option<Value>>, CapabilityError> {
        const OP: &str = "get";
        let collection = self.open_collection(OP, collection)?;
        let result = self.call_async(OP, &collection, &[key_object(key)])?;
        let found = result
            .downcast_ref::<Option<Object>>()
            .ok_or_else(|| CapabilityError::unexpected(OP, "module returned a document in an unknown form"))?;

        let Some(document) = found else {
            return Ok(Outcome::Done(None));
        };

        let document_type = self.supporting(OP, &self.document_type, VECTOR_DOCUMENT_TYPE)?;
        let value_of = document_type
            .method("value")
            .map_err(|e| CapabilityError::binding(OP, e))?;
        let value = value_of(document, &[]).map_err(|e| CapabilityError::invocation(OP, e))?;
        let native = value
            .downcast_ref::<NativeValue>()
            .ok_or_else(|| CapabilityError::unexpected(OP, "document value has an unknown form"))?;

        Ok(Outcome::Done(Some(self.bridge.decode(native))))
    }

    fn delete(&self, collection: &str, key: &str) -> Result<Outcome<()>, CapabilityError> {
        const OP: &str = "delete";
        let collection = self.open_collection(OP, collection)?;
        self.call_async(OP, &collection, &[key_object(key)])?;
        Ok(Outcome::Done(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::module::{arg, ModuleRegistry};

    /// Counts every type lookup.
    #[derive(Default)]
    struct CountingLoader {
        inner: ModuleRegistry,
        lookups: AtomicUsize,
    }

    impl ModuleLoader for CountingLoader {
        fn load_type(&self, name: &str) -> Option<Arc<TypeHandle>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.load_type(name)
        }
    }

    #[derive(Clone)]
    struct Item(&'static str);

    /// Collection type whose search returns two fixed items.
    fn fake_collection() -> TypeHandle {
        TypeHandle::builder(VECTOR_COLLECTION_TYPE)
            .constructor("collection", |args| Ok(object(arg::<String>(args, 1)?.clone())))
            .async_method("search", |_, _| {
                Box::pin(async { Ok(object(vec![object(Item("a")), object(Item("b"))])) })
            })
            .build()
    }

    fn passthrough_support(loader: &ModuleRegistry) {
        loader.register(
            TypeHandle::builder(VECTOR_VALUES_TYPE)
                .constructor("of", |args| Ok(object(arg::<Vec<f32>>(args, 0)?.clone())))
                .build(),
        );
        loader.register(
            TypeHandle::builder(SEARCH_OPTIONS_TYPE)
                .constructor("builder", |_| Ok(object(())))
                .method("limit", |b, _| Ok(b.clone()))
                .method("include_value", |b, _| Ok(b.clone()))
                .method("include_vectors", |b, _| Ok(b.clone()))
                .method("build", |b, _| Ok(b.clone()))
                .build(),
        );
    }

    #[test]
    fn stub_reports_unavailable_for_every_operation() {
        let stub = StubAdapter::new();

        let search = stub
            .search(&SearchRequest::new("docs", vec![1.0, 2.0, 3.0], 5))
            .unwrap();
        match search {
            Outcome::Unavailable(u) => {
                assert_eq!(u.operation, "search");
                assert!(u.message.contains("kvgrid-vector"));
            }
            Outcome::Done(_) => panic!("stub must not run searches"),
        }

        assert!(stub.put("docs", "k", &Value::Null, &[1.0]).unwrap().is_unavailable());
        assert!(stub.get("docs", "k").unwrap().is_unavailable());
        assert!(stub.delete("docs", "k").unwrap().is_unavailable());
    }

    #[test]
    fn absent_module_is_probed_exactly_once() {
        let loader = CountingLoader::default();
        let capability = detect(&loader, object(()), ValueBridge::json());
        assert_eq!(loader.lookups.load(Ordering::SeqCst), 1);

        for _ in 0..3 {
            let request = SearchRequest::new("docs", vec![1.0, 2.0, 3.0], 5);
            assert!(capability.search(&request).unwrap().is_unavailable());
            assert!(capability.get("docs", "k").unwrap().is_unavailable());
            assert!(capability.put("docs", "k", &Value::Null, &[]).unwrap().is_unavailable());
            assert!(capability.delete("docs", "k").unwrap().is_unavailable());
        }
        assert_eq!(loader.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn present_module_resolves_types_only_at_bind_time() {
        let loader = CountingLoader::default();
        loader.inner.register(fake_collection());
        let adapter = BoundAdapter::bind(&loader, object(()), ValueBridge::json())
            .unwrap()
            .unwrap();
        let after_bind = loader.lookups.load(Ordering::SeqCst);

        let _ = adapter.delete("docs", "k");
        let _ = adapter.get("docs", "k");
        assert_eq!(loader.lookups.load(Ordering::SeqCst), after_bind);
    }

    #[test]
    fn missing_supporting_type_is_a_binding_error() {
        let loader = ModuleRegistry::new();
        loader.register(fake_collection());
        let adapter = BoundAdapter::bind(&loader, object(()), ValueBridge::json())
            .unwrap()
            .unwrap();

        let err = adapter
            .put("docs", "k", &Value::from(1i64), &[0.5])
            .unwrap_err();
        assert!(matches!(err, CapabilityError::Binding { operation: "put", .. }));
        assert!(err.to_string().contains(VECTOR_DOCUMENT_TYPE));
    }

    #[test]
    fn missing_entry_point_is_a_binding_error() {
        let loader = ModuleRegistry::new();
        loader.register(fake_collection());
        let adapter = BoundAdapter::bind(&loader, object(()), ValueBridge::json())
            .unwrap()
            .unwrap();

        let err = adapter.delete("docs", "k").unwrap_err();
        assert!(matches!(err, CapabilityError::Binding { operation: "delete", .. }));
        assert!(err.to_string().contains("no member named 'delete'"));
    }

    #[test]
    fn unreadable_result_fields_are_omitted_individually() {
        let loader = ModuleRegistry::new();
        loader.register(fake_collection());
        passthrough_support(&loader);
        loader.register(
            TypeHandle::builder(SEARCH_RESULT_TYPE)
                .method("key", |item, _| {
                    let item = item.downcast_ref::<Item>().unwrap();
                    Ok(object(NativeValue::from(item.0)))
                })
                .method("score", |item, _| match item.downcast_ref::<Item>() {
                    Some(Item("a")) => Ok(object(0.9f32)),
                    _ => Err(crate::module::InvokeError::failed("score unavailable")),
                })
                // wrong type: should be Option<NativeValue>
                .method("value", |_, _| Ok(object(42u8)))
                .build(),
        );
        let adapter = BoundAdapter::bind(&loader, object(()), ValueBridge::json())
            .unwrap()
            .unwrap();

        let hits = adapter
            .search(&SearchRequest::new("docs", vec![0.0, 1.0], 2))
            .unwrap()
            .done()
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].key, Some(Value::from("a")));
        assert_eq!(hits[0].score, Some(0.9));
        assert_eq!(hits[0].value, None);
        assert_eq!(hits[1].key, Some(Value::from("b")));
        assert_eq!(hits[1].score, None);
        assert_eq!(hits[1].vector, None);
    }

    #[test]
    fn calls_from_inside_a_runtime_are_refused() {
        let loader = ModuleRegistry::new();
        loader.register(fake_collection());
        passthrough_support(&loader);
        loader.register(TypeHandle::builder(SEARCH_RESULT_TYPE).build());
        let adapter = BoundAdapter::bind(&loader, object(()), ValueBridge::json())
            .unwrap()
            .unwrap();

        let outer = Builder::new_current_thread().build().unwrap();
        let err = outer
            .block_on(async { adapter.search(&SearchRequest::new("docs", vec![1.0], 1)) })
            .unwrap_err();
        assert!(matches!(
            err,
            CapabilityError::NestedRuntime { operation: "search" }
        ));

        // the same adapter still works from a plain thread
        assert!(adapter
            .search(&SearchRequest::new("docs", vec![1.0], 1))
            .is_ok());
    }
}
