//! Error types for the tool layer.

use kvgrid_capability::CapabilityError;
use kvgrid_store::StoreError;
use thiserror::Error;

use crate::access::{Access, Target};
use crate::config::ConfigError;

/// Why a tool call failed.
///
/// These never become transport errors: the dispatcher turns them into a
/// tool result with `isError` set and the message as its text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("access denied: {access} access to {target} '{name}' is not permitted")]
    AccessDenied {
        target: Target,
        name: String,
        access: Access,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("value could not be converted: {0}")]
    Encode(#[from] kvgrid_value::Error),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The capability behind the tool is not installed.
    #[error("{0}")]
    Unavailable(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidArguments(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
