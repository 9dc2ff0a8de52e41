use std::sync::Arc;

use kvgrid_bridge::{value_to_json, ValueBridge};
use kvgrid_capability::VectorCapability;
use kvgrid_store::Grid;
use kvgrid_value::NativeValue;
use serde_json::Value as JsonValue;

use crate::access::AccessPolicy;
use crate::error::Result;

/// Everything a tool handler needs.
#[derive(Clone)]
pub struct ToolContext {
    pub grid: Arc<Grid>,
    pub bridge: ValueBridge,
    pub policy: AccessPolicy,
    pub vectors: Arc<dyn VectorCapability>,
}

impl ToolContext {
    pub fn new(
        grid: Arc<Grid>,
        bridge: ValueBridge,
        policy: AccessPolicy,
        vectors: Arc<dyn VectorCapability>,
    ) -> Self {
        Self {
            grid,
            bridge,
            policy,
            vectors,
        }
    }

    /// Decode a store value into response JSON.
    pub fn decode(&self, native: &NativeValue) -> Result<JsonValue> {
        Ok(value_to_json(&self.bridge.decode(native))?)
    }

    /// `null` when there is no value.
    pub fn decode_opt(&self, native: Option<NativeValue>) -> Result<JsonValue> {
        match native {
            Some(native) => self.decode(&native),
            None => Ok(JsonValue::Null),
        }
    }

    pub fn decode_all(&self, natives: &[NativeValue]) -> Result<JsonValue> {
        let items = self
            .bridge
            .decode_iter(natives)
            .map(|value| value_to_json(&value))
            .collect::<kvgrid_value::Result<Vec<_>>>()?;
        Ok(JsonValue::Array(items))
    }

    /// Encode caller JSON for storage.
    pub fn encode(&self, json: &JsonValue) -> Result<NativeValue> {
        Ok(self.bridge.encode_json(json)?)
    }
}
