//! Canonical -> store-native encoding.
//!
//! Every write is stored as JSON text, whatever shape the value has, so any
//! client reading the store can make sense of it.

use kvgrid_value::{JsonText, NativeValue, Result, Value};

use crate::{json_to_value, ValueBridge};

impl ValueBridge {
    /// Encode a Value as a Text-JSON native value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` when the value cannot be rendered as JSON
    /// (non-finite floats).
    pub fn encode(&self, value: &Value) -> Result<NativeValue> {
        let text = self.codec().encode(value)?;
        Ok(NativeValue::Json(JsonText::new(text)))
    }

    /// Encode a caller-supplied JSON document.
    pub fn encode_json(&self, json: &serde_json::Value) -> Result<NativeValue> {
        self.encode(&json_to_value(json.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvgrid_value::Error;

    #[test]
    fn null_encodes_to_null_text() {
        let bridge = ValueBridge::json();
        assert_eq!(bridge.encode(&Value::Null).unwrap(), NativeValue::json("null"));
    }

    #[test]
    fn nan_fails_with_encode_error() {
        let bridge = ValueBridge::json();
        let err = bridge.encode(&Value::Float(f64::NAN)).unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
    }

    #[test]
    fn encode_json_keeps_structure() {
        let bridge = ValueBridge::json();
        let native = bridge
            .encode_json(&serde_json::json!({"name": "Bob", "active": true}))
            .unwrap();

        let text = native.as_json().unwrap().as_str();
        let reparsed: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(reparsed, serde_json::json!({"name": "Bob", "active": true}));
    }
}
