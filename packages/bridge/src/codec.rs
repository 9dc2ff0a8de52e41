//! JSON codec implementation and Value <-> serde_json conversions.

use kvgrid_value::{Codec, Error, Result, Value};

/// A codec that handles JSON encoding/decoding.
///
/// This is the codec the server runs with. It converts between `Value` and
/// JSON text.
///
/// # Example
///
/// ```rust
/// use kvgrid_bridge::JsonCodec;
/// use kvgrid_value::{Codec, Value};
///
/// let codec = JsonCodec;
/// let value = Value::from("hello");
///
/// let text = codec.encode(&value).unwrap();
/// let decoded = codec.decode(&text).unwrap();
///
/// assert_eq!(decoded, value);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, text: &str) -> Result<Value> {
        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| Error::decode(e.to_string()))?;
        Ok(json_to_value(json))
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let json = value_to_json(value)?;
        serde_json::to_string(&json).map_err(|e| Error::encode(e.to_string()))
    }
}

/// Convert our Value to serde_json::Value.
///
/// Fails only for non-finite floats, which JSON cannot represent.
pub fn value_to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| Error::encode(format!("{} cannot be represented in JSON", f)))?,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(arr) => serde_json::Value::Array(
            arr.iter().map(value_to_json).collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), value_to_json(v)?)))
                .collect::<Result<serde_json::Map<_, _>>>()?,
        ),
    })
}

/// Convert serde_json::Value to our Value.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                // Fallback for very large numbers
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}
