//! Named types with dynamically invoked members.
//!
//! Optional modules publish their API as [`TypeHandle`]s registered under
//! stable names. Callers look types up by name through a [`ModuleLoader`] and
//! call members with type-erased [`Object`] arguments, so nothing outside
//! the module needs a compile-time dependency on it.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// A dynamically typed argument or return value.
pub type Object = Arc<dyn Any + Send + Sync>;

/// Future returned by an asynchronous member.
pub type CallFuture = Pin<Box<dyn Future<Output = Result<Object, InvokeError>> + Send>>;

/// Builds a new object from arguments.
pub type ConstructorFn = Arc<dyn Fn(&[Object]) -> Result<Object, InvokeError> + Send + Sync>;

/// Synchronous call on a receiver.
pub type MethodFn = Arc<dyn Fn(&Object, &[Object]) -> Result<Object, InvokeError> + Send + Sync>;

/// Asynchronous call on a receiver.
pub type AsyncMethodFn = Arc<dyn Fn(&Object, &[Object]) -> CallFuture + Send + Sync>;

/// Wrap any value as an [`Object`].
pub fn object<T: Any + Send + Sync>(value: T) -> Object {
    Arc::new(value)
}

/// Failure inside a dynamically invoked member.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("expected {expected} argument(s), got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("argument {index} is not a {expected}")]
    Argument { index: usize, expected: &'static str },

    #[error("receiver is not a {expected}")]
    Receiver { expected: &'static str },

    #[error("{0}")]
    Failed(String),
}

impl InvokeError {
    pub fn failed(message: impl Into<String>) -> Self {
        InvokeError::Failed(message.into())
    }
}

/// Check the argument count of a call.
pub fn arity(args: &[Object], expected: usize) -> Result<(), InvokeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(InvokeError::Arity {
            expected,
            actual: args.len(),
        })
    }
}

/// Borrow argument `index` as a `T`.
pub fn arg<T: Any>(args: &[Object], index: usize) -> Result<&T, InvokeError> {
    args.get(index)
        .and_then(|a| a.downcast_ref::<T>())
        .ok_or(InvokeError::Argument {
            index,
            expected: type_name::<T>(),
        })
}

/// Borrow a receiver as a `T`.
pub fn receiver<T: Any>(object: &Object) -> Result<&T, InvokeError> {
    object.downcast_ref::<T>().ok_or(InvokeError::Receiver {
        expected: type_name::<T>(),
    })
}

/// A type member, callable by name.
#[derive(Clone)]
pub enum Member {
    Constructor(ConstructorFn),
    Method(MethodFn),
    AsyncMethod(AsyncMethodFn),
}

impl Member {
    fn kind(&self) -> &'static str {
        match self {
            Member::Constructor(_) => "constructor",
            Member::Method(_) => "method",
            Member::AsyncMethod(_) => "async method",
        }
    }
}

/// Failure to resolve a member on a type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{type_name} has no member named '{member}'")]
    Missing { type_name: String, member: String },

    #[error("{type_name}::{member} is a {actual}, not a {expected}")]
    WrongKind {
        type_name: String,
        member: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A named type exported by a module.
pub struct TypeHandle {
    name: String,
    members: HashMap<String, Member>,
}

impl TypeHandle {
    pub fn builder(name: impl Into<String>) -> TypeHandleBuilder {
        TypeHandleBuilder {
            handle: TypeHandle {
                name: name.into(),
                members: HashMap::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all members, sorted.
    pub fn member_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.members.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn constructor(&self, name: &str) -> Result<&ConstructorFn, LookupError> {
        match self.member(name)? {
            Member::Constructor(f) => Ok(f),
            other => Err(self.wrong_kind(name, "constructor", other)),
        }
    }

    pub fn method(&self, name: &str) -> Result<&MethodFn, LookupError> {
        match self.member(name)? {
            Member::Method(f) => Ok(f),
            other => Err(self.wrong_kind(name, "method", other)),
        }
    }

    pub fn async_method(&self, name: &str) -> Result<&AsyncMethodFn, LookupError> {
        match self.member(name)? {
            Member::AsyncMethod(f) => Ok(f),
            other => Err(self.wrong_kind(name, "async method", other)),
        }
    }

    fn member(&self, name: &str) -> Result<&Member, LookupError> {
        self.members.get(name).ok_or_else(|| LookupError::Missing {
            type_name: self.name.clone(),
            member: name.to_string(),
        })
    }

    fn wrong_kind(&self, name: &str, expected: &'static str, actual: &Member) -> LookupError {
        LookupError::WrongKind {
            type_name: self.name.clone(),
            member: name.to_string(),
            expected,
            actual: actual.kind(),
        }
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("name", &self.name)
            .field("members", &self.member_names())
            .finish()
    }
}

/// Builder for [`TypeHandle`].
pub struct TypeHandleBuilder {
    handle: TypeHandle,
}

impl TypeHandleBuilder {
    pub fn constructor<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&[Object]) -> Result<Object, InvokeError> + Send + Sync + 'static,
    {
        self.handle
            .members
            .insert(name.to_string(), Member::Constructor(Arc::new(f)));
        self
    }

    pub fn method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Object, &[Object]) -> Result<Object, InvokeError> + Send + Sync + 'static,
    {
        self.handle
            .members
            .insert(name.to_string(), Member::Method(Arc::new(f)));
        self
    }

    pub fn async_method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Object, &[Object]) -> CallFuture + Send + Sync + 'static,
    {
        self.handle
            .members
            .insert(name.to_string(), Member::AsyncMethod(Arc::new(f)));
        self
    }

    pub fn build(self) -> TypeHandle {
        self.handle
    }
}

/// Resolves type names to handles.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `&dyn ModuleLoader`.
pub trait ModuleLoader: Send + Sync {
    /// Look up a type by its fully qualified name.
    fn load_type(&self, name: &str) -> Option<Arc<TypeHandle>>;
}

impl<T: ModuleLoader + ?Sized> ModuleLoader for Arc<T> {
    fn load_type(&self, name: &str) -> Option<Arc<TypeHandle>> {
        (**self).load_type(name)
    }
}

/// A bundle of types installed together.
pub trait Module {
    /// Module name and version, for logs.
    fn name(&self) -> &str;

    /// The types this module exports.
    fn types(&self) -> Vec<TypeHandle>;
}

/// The set of types available to this process.
///
/// Modules are installed once at start-up; lookups afterwards are read-only.
#[derive(Default)]
pub struct ModuleRegistry {
    types: RwLock<HashMap<String, Arc<TypeHandle>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single type, replacing any type with the same name.
    pub fn register(&self, handle: TypeHandle) {
        let mut types = self.types.write().unwrap();
        types.insert(handle.name().to_string(), Arc::new(handle));
    }

    /// Register every type a module exports.
    pub fn install(&self, module: &dyn Module) {
        let types = module.types();
        tracing::debug!(module = module.name(), types = types.len(), "installing module");
        for handle in types {
            self.register(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModuleLoader for ModuleRegistry {
    fn load_type(&self, name: &str) -> Option<Arc<TypeHandle>> {
        self.types.read().unwrap().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_type() -> TypeHandle {
        TypeHandle::builder("test.Counter")
            .constructor("new", |args| {
                arity(args, 1)?;
                Ok(object(*arg::<i64>(args, 0)?))
            })
            .method("doubled", |this, _args| {
                Ok(object(receiver::<i64>(this)? * 2))
            })
            .build()
    }

    #[test]
    fn constructor_and_method_round_trip() {
        let handle = counter_type();
        let make = handle.constructor("new").unwrap();
        let counter = make(&[object(21i64)]).unwrap();

        let doubled = handle.method("doubled").unwrap()(&counter, &[]).unwrap();
        assert_eq!(doubled.downcast_ref::<i64>(), Some(&42));
    }

    #[test]
    fn wrong_argument_type_is_reported() {
        let handle = counter_type();
        let err = handle.constructor("new").unwrap()(&[object("nope")]).unwrap_err();
        assert!(matches!(err, InvokeError::Argument { index: 0, .. }));

        let err = handle.constructor("new").unwrap()(&[]).unwrap_err();
        assert_eq!(
            err,
            InvokeError::Arity {
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn lookup_errors_name_type_and_member() {
        let handle = counter_type();

        let err = handle.method("missing").err().unwrap();
        assert_eq!(err.to_string(), "test.Counter has no member named 'missing'");

        let err = handle.async_method("doubled").err().unwrap();
        assert!(matches!(err, LookupError::WrongKind { actual: "method", .. }));
    }

    #[test]
    fn registry_resolves_registered_types() {
        let registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.load_type("test.Counter").is_none());

        registry.register(counter_type());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.load_type("test.Counter").unwrap().member_names(),
            vec!["doubled", "new"]
        );
    }
}
