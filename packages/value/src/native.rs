//! Store-native values.
//!
//! These are the shapes a value can take inside the store. The bridge turns
//! every one of them into a [`Value`](crate::Value); nothing in this module
//! is ever handed to a tool caller directly.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::record::GenericRecord;

/// A value whose payload is JSON text.
///
/// This is the encoding every write goes through. The text is usually valid
/// JSON, but values written by other clients may not be, so readers must not
/// assume it parses.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JsonText(String);

impl JsonText {
    pub fn new(text: impl Into<String>) -> Self {
        JsonText(text.into())
    }

    /// The raw JSON payload.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for JsonText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An arbitrary object the bridge has no conversion for.
///
/// Carries its runtime type name so the decoder can say what it was.
#[derive(Clone)]
pub struct Opaque {
    type_name: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    /// Wrap any value, recording its Rust type name.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            inner: Arc::new(value),
        }
    }

    /// Wrap an already shared object under an explicit type name.
    pub fn named(type_name: impl Into<String>, inner: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            type_name: type_name.into(),
            inner,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opaque")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A value as the store holds it.
#[derive(Clone, Default)]
pub enum NativeValue {
    #[default]
    Null,
    /// Pass-through JSON text.
    Json(JsonText),
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Mapping-like container; keys may be any native value.
    Map(Vec<(NativeValue, NativeValue)>),
    /// Sequence-like container.
    Seq(Vec<NativeValue>),
    /// Schema-based record whose field kinds are discovered at read time.
    Record(Arc<dyn GenericRecord>),
    /// Anything else.
    Opaque(Opaque),
}

impl NativeValue {
    /// Wrap JSON text.
    pub fn json(text: impl Into<String>) -> Self {
        NativeValue::Json(JsonText::new(text))
    }

    /// Wrap a generic record.
    pub fn record(record: impl GenericRecord + 'static) -> Self {
        NativeValue::Record(Arc::new(record))
    }

    /// Wrap an arbitrary object.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        NativeValue::Opaque(Opaque::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    /// The JSON payload, when this is a Text-JSON value.
    pub fn as_json(&self) -> Option<&JsonText> {
        match self {
            NativeValue::Json(text) => Some(text),
            _ => None,
        }
    }

    /// Human-readable runtime type name.
    pub fn type_name(&self) -> String {
        match self {
            NativeValue::Null => "null".to_string(),
            NativeValue::Json(_) => "JsonText".to_string(),
            NativeValue::Bool(_) => "bool".to_string(),
            NativeValue::Int(_) => "i64".to_string(),
            NativeValue::Float(_) => "f64".to_string(),
            NativeValue::Str(_) => "String".to_string(),
            NativeValue::Map(_) => "Map".to_string(),
            NativeValue::Seq(_) => "Seq".to_string(),
            NativeValue::Record(record) => record.type_name().to_string(),
            NativeValue::Opaque(opaque) => opaque.type_name().to_string(),
        }
    }
}

impl fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Null => f.write_str("Null"),
            NativeValue::Json(text) => f.debug_tuple("Json").field(&text.as_str()).finish(),
            NativeValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            NativeValue::Int(i) => f.debug_tuple("Int").field(i).finish(),
            NativeValue::Float(x) => f.debug_tuple("Float").field(x).finish(),
            NativeValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            NativeValue::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            NativeValue::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            NativeValue::Record(record) => f
                .debug_struct("Record")
                .field("type_name", &record.type_name())
                .field("fields", &record.field_names())
                .finish(),
            NativeValue::Opaque(opaque) => fmt::Debug::fmt(opaque, f),
        }
    }
}

impl PartialEq for NativeValue {
    /// Structural equality. Records compare by identity, opaque objects never
    /// compare equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NativeValue::Null, NativeValue::Null) => true,
            (NativeValue::Json(a), NativeValue::Json(b)) => a == b,
            (NativeValue::Bool(a), NativeValue::Bool(b)) => a == b,
            (NativeValue::Int(a), NativeValue::Int(b)) => a == b,
            (NativeValue::Float(a), NativeValue::Float(b)) => a == b,
            (NativeValue::Str(a), NativeValue::Str(b)) => a == b,
            (NativeValue::Map(a), NativeValue::Map(b)) => a == b,
            (NativeValue::Seq(a), NativeValue::Seq(b)) => a == b,
            (NativeValue::Record(a), NativeValue::Record(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<JsonText> for NativeValue {
    fn from(text: JsonText) -> Self {
        NativeValue::Json(text)
    }
}

impl From<bool> for NativeValue {
    fn from(v: bool) -> Self {
        NativeValue::Bool(v)
    }
}

impl From<i64> for NativeValue {
    fn from(v: i64) -> Self {
        NativeValue::Int(v)
    }
}

impl From<f64> for NativeValue {
    fn from(v: f64) -> Self {
        NativeValue::Float(v)
    }
}

impl From<&str> for NativeValue {
    fn from(v: &str) -> Self {
        NativeValue::Str(v.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(v: String) -> Self {
        NativeValue::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ThreadHandle;

    #[test]
    fn opaque_records_type_name() {
        let value = NativeValue::opaque(ThreadHandle);
        assert!(value.type_name().ends_with("ThreadHandle"));
    }

    #[test]
    fn opaque_values_never_compare_equal() {
        let a = NativeValue::opaque(1u8);
        assert_ne!(a.clone(), a);
    }

    #[test]
    fn json_text_accessors() {
        let value = NativeValue::json("{\"a\":1}");
        assert_eq!(value.as_json().map(JsonText::as_str), Some("{\"a\":1}"));
        assert_eq!(NativeValue::Int(1).as_json(), None);
    }
}
