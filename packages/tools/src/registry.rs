//! Tool definitions and the registry that dispatches calls to them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use tracing::debug;

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::{Result, ToolError};
use crate::result::ToolResult;

/// Runs a tool. Access has already been checked.
pub type Handler = fn(&ToolContext, &Args<'_>) -> Result<JsonValue>;

/// What `tools/list` reports for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    String,
    Integer,
    Boolean,
    /// Array of numbers.
    Vector,
    /// Any JSON value.
    Any,
}

impl Param {
    fn schema(self, description: &str) -> JsonValue {
        match self {
            Param::String => json!({"type": "string", "description": description}),
            Param::Integer => json!({"type": "integer", "description": description}),
            Param::Boolean => json!({"type": "boolean", "description": description}),
            Param::Vector => json!({
                "type": "array",
                "items": {"type": "number"},
                "description": description
            }),
            Param::Any => json!({"description": description}),
        }
    }
}

/// Builder for a tool's input schema.
///
/// Every tool takes the structure name as `name`, so it is always present.
#[derive(Debug, Clone)]
pub struct Schema {
    properties: Map<String, JsonValue>,
    required: Vec<String>,
}

impl Schema {
    pub fn named(what: &str) -> Self {
        Self {
            properties: Map::new(),
            required: Vec::new(),
        }
        .required("name", Param::String, &format!("Name of the {}", what))
    }

    pub fn required(mut self, name: &str, param: Param, description: &str) -> Self {
        self.properties
            .insert(name.to_string(), param.schema(description));
        self.required.push(name.to_string());
        self
    }

    pub fn optional(mut self, name: &str, param: Param, description: &str) -> Self {
        self.properties
            .insert(name.to_string(), param.schema(description));
        self
    }

    pub fn build(self) -> JsonValue {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }
}

/// A tool: its definition, what it touches, and how to run it.
#[derive(Clone)]
pub struct Tool {
    pub definition: ToolDefinition,
    pub target: Target,
    pub access: Access,
    handler: Handler,
}

impl Tool {
    pub fn new(
        name: &str,
        description: &str,
        target: Target,
        access: Access,
        schema: Schema,
        handler: Handler,
    ) -> Self {
        Self {
            definition: ToolDefinition {
                name: name.to_string(),
                description: description.to_string(),
                input_schema: schema.build(),
            },
            target,
            access,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.definition.name)
            .field("target", &self.target)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

/// All tools, by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// # Panics
    ///
    /// Panics if a tool with the same name is already registered.
    pub fn register(&mut self, tool: Tool) {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            panic!("duplicate tool registration: '{}'", name);
        }
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Definitions sorted by name.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        let mut definitions: Vec<_> = self.tools.values().map(|t| &t.definition).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool. Failures come back as error results, never as `Err`.
    pub fn call(&self, context: &ToolContext, name: &str, arguments: &JsonValue) -> ToolResult {
        debug!(tool = name, "tool call");
        match self.try_call(context, name, arguments) {
            Ok(data) => ToolResult::success(&data),
            Err(e) => {
                debug!(tool = name, error = %e, "tool call failed");
                ToolResult::error(e.to_string())
            }
        }
    }

    fn try_call(&self, context: &ToolContext, name: &str, arguments: &JsonValue) -> Result<JsonValue> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let args = Args::new(arguments)?;
        context
            .policy
            .check(tool.target, args.name()?, tool.access)?;
        (tool.handler)(context, &args)
    }
}
