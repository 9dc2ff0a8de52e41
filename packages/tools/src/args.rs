//! Typed access to tool-call arguments.

use serde_json::{Map, Value as JsonValue};

use crate::error::{Result, ToolError};

/// The `arguments` object of a tool call.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    fields: Option<&'a Map<String, JsonValue>>,
}

impl<'a> Args<'a> {
    /// Arguments must be an object, or absent.
    pub fn new(arguments: &'a JsonValue) -> Result<Self> {
        match arguments {
            JsonValue::Object(fields) => Ok(Self {
                fields: Some(fields),
            }),
            JsonValue::Null => Ok(Self { fields: None }),
            other => Err(ToolError::invalid(format!(
                "arguments must be an object, got {}",
                json_kind(other)
            ))),
        }
    }

    fn field(&self, name: &str) -> Option<&'a JsonValue> {
        self.fields
            .and_then(|f| f.get(name))
            .filter(|v| !v.is_null())
    }

    fn require(&self, name: &str) -> Result<&'a JsonValue> {
        self.field(name)
            .ok_or_else(|| ToolError::invalid(format!("missing required argument '{}'", name)))
    }

    /// Any JSON value. `null` counts as missing.
    pub fn value(&self, name: &str) -> Result<&'a JsonValue> {
        self.require(name)
    }

    pub fn str(&self, name: &str) -> Result<&'a str> {
        let value = self.require(name)?;
        value.as_str().ok_or_else(|| wrong_type(name, "a string", value))
    }

    pub fn opt_str(&self, name: &str) -> Result<Option<&'a str>> {
        match self.field(name) {
            Some(_) => self.str(name).map(Some),
            None => Ok(None),
        }
    }

    /// A non-empty string. Used for structure names.
    pub fn name(&self) -> Result<&'a str> {
        let name = self.str("name")?;
        if name.is_empty() {
            return Err(ToolError::invalid("'name' must not be empty"));
        }
        Ok(name)
    }

    pub fn i64(&self, name: &str) -> Result<i64> {
        let value = self.require(name)?;
        value.as_i64().ok_or_else(|| wrong_type(name, "an integer", value))
    }

    pub fn usize(&self, name: &str) -> Result<usize> {
        let value = self.require(name)?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| wrong_type(name, "a non-negative integer", value))
    }

    pub fn opt_usize(&self, name: &str) -> Result<Option<usize>> {
        match self.field(name) {
            Some(_) => self.usize(name).map(Some),
            None => Ok(None),
        }
    }

    pub fn opt_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.field(name) {
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| wrong_type(name, "a boolean", value)),
            None => Ok(None),
        }
    }

    /// An array of numbers, narrowed to `f32`.
    pub fn vector(&self, name: &str) -> Result<Vec<f32>> {
        let value = self.require(name)?;
        let items = value
            .as_array()
            .ok_or_else(|| wrong_type(name, "an array of numbers", value))?;
        items
            .iter()
            .map(|item| {
                item.as_f64()
                    .map(|f| f as f32)
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| wrong_type(name, "an array of finite numbers", value))
            })
            .collect()
    }
}

fn wrong_type(name: &str, expected: &str, got: &JsonValue) -> ToolError {
    ToolError::invalid(format!(
        "argument '{}' must be {}, got {}",
        name,
        expected,
        json_kind(got)
    ))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_getters() {
        let raw = json!({"name": "m", "index": 2, "delta": -5, "flag": true, "v": [1, 2.5]});
        let args = Args::new(&raw).unwrap();

        assert_eq!(args.name().unwrap(), "m");
        assert_eq!(args.usize("index").unwrap(), 2);
        assert_eq!(args.i64("delta").unwrap(), -5);
        assert_eq!(args.opt_bool("flag").unwrap(), Some(true));
        assert_eq!(args.opt_bool("absent").unwrap(), None);
        assert_eq!(args.vector("v").unwrap(), vec![1.0, 2.5]);
    }

    #[test]
    fn errors_name_the_argument() {
        let raw = json!({"name": 3, "index": -1, "key": null});
        let args = Args::new(&raw).unwrap();

        let err = args.name().unwrap_err().to_string();
        assert_eq!(err, "invalid arguments: argument 'name' must be a string, got a number");
        assert!(args.usize("index").is_err());
        assert!(args
            .value("key")
            .unwrap_err()
            .to_string()
            .contains("missing required argument 'key'"));
    }

    #[test]
    fn arguments_must_be_an_object() {
        assert!(Args::new(&json!([1, 2])).is_err());
        let none = Args::new(&JsonValue::Null).unwrap();
        assert!(none.str("name").is_err());
    }
}
