//! Error types for capability operations.

use thiserror::Error;

use crate::module::{InvokeError, LookupError};

/// A capability that is present failed to carry out an operation.
///
/// Every variant names the operation and a plain-language cause; nothing
/// from inside the module leaks through except its message.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// A type or member the adapter relies on could not be resolved.
    #[error("vector {operation} failed: the installed vector module does not provide {detail}")]
    Binding {
        operation: &'static str,
        detail: String,
    },

    /// The module was called and reported a failure, or returned something
    /// the adapter could not interpret.
    #[error("vector {operation} failed: {detail}")]
    Invocation {
        operation: &'static str,
        detail: String,
    },

    /// The value to store could not be encoded.
    #[error("vector {operation} failed: value could not be encoded: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: kvgrid_value::Error,
    },

    /// A blocking call was made from a thread already driving an async
    /// runtime, where waiting on the module would deadlock.
    #[error("vector {operation} failed: called from inside an async runtime; call it from a blocking thread instead")]
    NestedRuntime { operation: &'static str },

    /// The executor used to wait on the module could not be started.
    #[error("vector support could not start: {0}")]
    Runtime(String),
}

impl CapabilityError {
    pub(crate) fn binding(operation: &'static str, err: LookupError) -> Self {
        CapabilityError::Binding {
            operation,
            detail: err.to_string(),
        }
    }

    pub(crate) fn missing_type(operation: &'static str, type_name: &str) -> Self {
        CapabilityError::Binding {
            operation,
            detail: format!("type {}", type_name),
        }
    }

    pub(crate) fn invocation(operation: &'static str, err: InvokeError) -> Self {
        CapabilityError::Invocation {
            operation,
            detail: err.to_string(),
        }
    }

    pub(crate) fn unexpected(operation: &'static str, what: impl Into<String>) -> Self {
        CapabilityError::Invocation {
            operation,
            detail: what.into(),
        }
    }

    /// Name of the operation that failed, if it got that far.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            CapabilityError::Binding { operation, .. }
            | CapabilityError::Invocation { operation, .. }
            | CapabilityError::Encode { operation, .. }
            | CapabilityError::NestedRuntime { operation } => Some(operation),
            CapabilityError::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_error_names_operation_and_member() {
        let err = CapabilityError::binding(
            "search",
            LookupError::Missing {
                type_name: "kvgrid.vector.VectorCollection".to_string(),
                member: "search".to_string(),
            },
        );
        let display = err.to_string();
        assert!(display.starts_with("vector search failed"));
        assert!(display.contains("no member named 'search'"));
        assert_eq!(err.operation(), Some("search"));
    }

    #[test]
    fn invocation_error_carries_module_message() {
        let err = CapabilityError::invocation("put", InvokeError::failed("dimension mismatch"));
        assert_eq!(err.to_string(), "vector put failed: dimension mismatch");
    }
}
