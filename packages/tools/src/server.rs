//! Line-delimited JSON-RPC server.
//!
//! Each request is one line of JSON on the reader; each response is one line
//! on the writer. Notifications get no response.

use std::io::{self, BufRead, Write};

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::context::ToolContext;
use crate::protocol::{
    error_codes, methods, JsonRpcId, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION,
    PROTOCOL_VERSION,
};
use crate::registry::ToolRegistry;

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: JsonValue,
}

pub struct McpServer {
    name: String,
    registry: ToolRegistry,
    context: ToolContext,
}

impl McpServer {
    pub fn new(name: impl Into<String>, registry: ToolRegistry, context: ToolContext) -> Self {
        Self {
            name: name.into(),
            registry,
            context,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve until the reader is exhausted.
    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> io::Result<()> {
        info!(server = %self.name, tools = self.registry.len(), "serving on stdio");
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line) {
                let text = serde_json::to_string(&response).map_err(io::Error::other)?;
                writeln!(writer, "{}", text)?;
                writer.flush()?;
            }
        }
        info!("input closed, shutting down");
        Ok(())
    }

    /// Handle one line of input.
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let raw: JsonValue = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("parse error: {}", e),
                ));
            }
        };

        let id = raw.get("id").cloned().and_then(|id| serde_json::from_value(id).ok());
        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle(request),
            Err(e) => Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("invalid request: {}", e),
            )),
        }
    }

    pub fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!(method = %request.method, "notification");
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                Some(id),
                error_codes::INVALID_REQUEST,
                format!("unsupported jsonrpc version '{}'", request.jsonrpc),
            ));
        }

        debug!(method = %request.method, "request");
        Some(match request.method.as_str() {
            methods::INITIALIZE => self.initialize(id),
            methods::PING => JsonRpcResponse::success(Some(id), json!({})),
            methods::TOOLS_LIST => self.list_tools(id),
            methods::TOOLS_CALL => self.call_tool(id, request.params),
            other => JsonRpcResponse::error(
                Some(id),
                error_codes::METHOD_NOT_FOUND,
                format!("method not found: {}", other),
            ),
        })
    }

    fn initialize(&self, id: JsonRpcId) -> JsonRpcResponse {
        JsonRpcResponse::success(
            Some(id),
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": {
                    "name": self.name,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )
    }

    fn list_tools(&self, id: JsonRpcId) -> JsonRpcResponse {
        JsonRpcResponse::success(Some(id), json!({ "tools": self.registry.list() }))
    }

    fn call_tool(&self, id: JsonRpcId, params: Option<JsonValue>) -> JsonRpcResponse {
        let params: CallParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    Some(id),
                    error_codes::INVALID_PARAMS,
                    format!("invalid tools/call params: {}", e),
                )
            }
            None => {
                return JsonRpcResponse::error(
                    Some(id),
                    error_codes::INVALID_PARAMS,
                    "tools/call requires params",
                )
            }
        };

        let result = self
            .registry
            .call(&self.context, &params.name, &params.arguments);
        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(Some(id), value),
            Err(e) => JsonRpcResponse::error(Some(id), error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }
}
