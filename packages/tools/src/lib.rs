//! kvgrid Tools
//!
//! Exposes grid structures as named tools over line-delimited JSON-RPC.
//!
//! - [`ServerConfig`]: YAML configuration
//! - [`AccessPolicy`]: which structures each tool may read or write
//! - [`ToolRegistry`]: tool definitions and dispatch
//! - [`McpServer`]: `initialize`, `tools/list`, `tools/call` and `ping`
//!
//! Values read from the store pass through the value decoder on the way
//! out; caller JSON passes through the encoder on the way in.

mod access;
mod args;
mod config;
mod context;
mod error;
mod protocol;
mod registry;
mod result;
mod server;
mod tools;

pub use access::{Access, AccessPolicy, Target};
pub use args::Args;
pub use config::{AccessConfig, AccessRule, ConfigError, ServerConfig, VectorConfig};
pub use context::ToolContext;
pub use error::{Result, ToolError};
pub use protocol::{
    error_codes, methods, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    PROTOCOL_VERSION,
};
pub use registry::{Handler, Param, Schema, Tool, ToolDefinition, ToolRegistry};
pub use result::{Content, ToolResult};
pub use server::McpServer;
pub use tools::{all_tools, register_all_tools};
