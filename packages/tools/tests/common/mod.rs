#![allow(dead_code)]

use std::sync::Arc;

use kvgrid_bridge::ValueBridge;
use kvgrid_capability::{detect, object, ModuleRegistry};
use kvgrid_store::Grid;
use kvgrid_tools::{register_all_tools, AccessPolicy, ToolContext, ToolRegistry, ToolResult};
use kvgrid_vector::VectorModule;
use serde_json::Value as JsonValue;

pub struct Harness {
    pub registry: ToolRegistry,
    pub context: ToolContext,
}

impl Harness {
    /// All tools, permissive policy, vector module installed.
    pub fn new() -> Self {
        Self::build(AccessPolicy::permissive(), true)
    }

    pub fn build(policy: AccessPolicy, with_vectors: bool) -> Self {
        let grid = Arc::new(Grid::new("test").with_ring_buffer_capacity(3));
        let modules = ModuleRegistry::new();
        if with_vectors {
            modules.install(&VectorModule::new());
        }
        let bridge = ValueBridge::json();
        let vectors = detect(&modules, object(Arc::clone(&grid)), bridge.clone());
        Self {
            registry: register_all_tools(),
            context: ToolContext::new(grid, bridge, policy, vectors),
        }
    }

    pub fn call(&self, tool: &str, arguments: JsonValue) -> ToolResult {
        self.registry.call(&self.context, tool, &arguments)
    }

    /// Call a tool that must succeed and return its JSON output.
    pub fn ok(&self, tool: &str, arguments: JsonValue) -> JsonValue {
        let result = self.call(tool, arguments);
        assert!(!result.is_error, "{} failed: {}", tool, result.text());
        result.json().expect("tool output is JSON")
    }

    /// Call a tool that must fail and return its message.
    pub fn err(&self, tool: &str, arguments: JsonValue) -> String {
        let result = self.call(tool, arguments);
        assert!(result.is_error, "{} unexpectedly succeeded: {}", tool, result.text());
        result.text().to_string()
    }
}
