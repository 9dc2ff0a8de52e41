//! Store-native -> canonical decoding.
//!
//! Decoding is total. Every input produces a `Value`; problems are folded
//! into the output as strings or diagnostic maps instead of being returned
//! as errors, so one bad field never costs a caller the rest of a record.

use std::collections::BTreeMap;
use std::iter::FusedIterator;
use std::slice;

use kvgrid_value::chrono::{DateTime, FixedOffset, NaiveDateTime};
use kvgrid_value::{FieldError, FieldKind, FieldValue, GenericRecord, NativeValue, Value};
use tracing::{debug, warn};

use crate::ValueBridge;

/// Reserved key naming the runtime type of an unconvertible value.
pub const TYPE_KEY: &str = "_type";
/// Reserved key carrying the reason a value could not be converted.
pub const ERROR_KEY: &str = "_error";
/// Reserved key naming the implementing type of a generic record.
pub const COMPACT_TYPE_KEY: &str = "_compactType";

/// Field placeholder when no kind accepts the field.
pub const UNKNOWN_FIELD_TYPE: &str = "<unknown field type>";

impl ValueBridge {
    /// Convert a store-native value into a canonical Value. Never fails.
    pub fn decode(&self, native: &NativeValue) -> Value {
        match native {
            NativeValue::Null => Value::Null,
            NativeValue::Json(text) => match self.codec().decode(text.as_str()) {
                Ok(value) => value,
                Err(e) => {
                    debug!(error = %e, "stored JSON text does not parse, returning it verbatim");
                    Value::String(text.as_str().to_string())
                }
            },
            NativeValue::Bool(b) => Value::Bool(*b),
            NativeValue::Int(i) => Value::Integer(*i),
            NativeValue::Float(f) => float_value(*f),
            NativeValue::Str(s) => Value::String(s.clone()),
            NativeValue::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (self.key_string(k), self.decode(v)))
                    .collect(),
            ),
            NativeValue::Seq(items) => Value::Array(self.decode_iter(items).collect()),
            NativeValue::Record(record) => self.decode_record(record.as_ref()),
            NativeValue::Opaque(opaque) => unsupported(opaque.type_name()),
        }
    }

    /// Decode a sequence element by element, on demand.
    ///
    /// Nothing is converted until the iterator is advanced, so callers that
    /// page or truncate a large collection only pay for what they keep.
    pub fn decode_iter<'a>(&'a self, items: &'a [NativeValue]) -> DecodeIter<'a> {
        DecodeIter {
            bridge: self,
            items: items.iter(),
        }
    }

    /// Convert a generic record into a map keyed by field name.
    ///
    /// The map also carries [`COMPACT_TYPE_KEY`]. It is written last, so a
    /// record field with that name is overwritten.
    pub fn decode_record(&self, record: &dyn GenericRecord) -> Value {
        let mut map = BTreeMap::new();
        for name in record.field_names() {
            let value = self.decode_field(record, &name);
            map.insert(name, value);
        }
        map.insert(
            COMPACT_TYPE_KEY.to_string(),
            Value::String(record.type_name().to_string()),
        );
        Value::Map(map)
    }

    fn decode_field(&self, record: &dyn GenericRecord, name: &str) -> Value {
        match read_field(record, name) {
            Ok(Some(field)) => self.field_to_value(field),
            Ok(None) => Value::String(UNKNOWN_FIELD_TYPE.to_string()),
            Err(e) => {
                warn!(
                    record = record.type_name(),
                    field = name,
                    error = %e,
                    "could not read record field"
                );
                Value::String(format!("<unreadable: {}>", e))
            }
        }
    }

    fn field_to_value(&self, field: FieldValue) -> Value {
        match field {
            FieldValue::String(s) => Value::from(s),
            FieldValue::Int32(i) => Value::from(i),
            FieldValue::Int64(i) => Value::from(i),
            FieldValue::Float64(f) => float_value(f),
            FieldValue::Float32(f) => float32_value(f),
            FieldValue::Boolean(b) => Value::Bool(b),
            FieldValue::Int16(i) => Value::Integer(i as i64),
            FieldValue::Int8(i) => Value::Integer(i as i64),
            FieldValue::Record(r) => r
                .map(|r| self.decode_record(r.as_ref()))
                .unwrap_or(Value::Null),
            FieldValue::StringArray(a) => array(a, Value::from),
            FieldValue::Int32Array(a) => array(a, Value::from),
            FieldValue::Int64Array(a) => array(a, Value::from),
            FieldValue::Float64Array(a) => array(a, float_value),
            FieldValue::BooleanArray(a) => array(a, Value::Bool),
            FieldValue::RecordArray(a) => array(a, |r| {
                r.map(|r| self.decode_record(r.as_ref()))
                    .unwrap_or(Value::Null)
            }),
            FieldValue::NullableBoolean(b) => Value::from(b),
            FieldValue::NullableInt32(i) => Value::from(i),
            FieldValue::NullableInt64(i) => Value::from(i),
            FieldValue::NullableFloat64(f) => f.map(float_value).unwrap_or(Value::Null),
            // Decimal text keeps every digit; a float would not.
            FieldValue::Decimal(d) => Value::from(d.map(|d| d.to_string())),
            FieldValue::Time(t) => Value::from(t.map(|t| t.format("%H:%M:%S%.f").to_string())),
            FieldValue::Date(d) => Value::from(d.map(|d| d.format("%Y-%m-%d").to_string())),
            FieldValue::Timestamp(ts) => Value::from(ts.map(iso_timestamp)),
            FieldValue::TimestampWithTimezone(ts) => Value::from(ts.map(iso_offset_timestamp)),
        }
    }

    /// Stringify a map key.
    fn key_string(&self, key: &NativeValue) -> String {
        match key {
            NativeValue::Str(s) => s.clone(),
            NativeValue::Json(text) => text.as_str().to_string(),
            NativeValue::Null => "null".to_string(),
            NativeValue::Bool(b) => b.to_string(),
            NativeValue::Int(i) => i.to_string(),
            NativeValue::Float(f) => f.to_string(),
            other => {
                let decoded = self.decode(other);
                self.codec()
                    .encode(&decoded)
                    .unwrap_or_else(|_| other.type_name())
            }
        }
    }
}

/// Lazily decoding iterator over a native sequence.
pub struct DecodeIter<'a> {
    bridge: &'a ValueBridge,
    items: slice::Iter<'a, NativeValue>,
}

impl Iterator for DecodeIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.items.next().map(|item| self.bridge.decode(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Value> {
        self.items.nth(n).map(|item| self.bridge.decode(item))
    }
}

impl ExactSizeIterator for DecodeIter<'_> {}

impl FusedIterator for DecodeIter<'_> {}

/// Read one field, preferring the kind the record reports.
///
/// `Ok(None)` means no kind was accepted.
fn read_field(record: &dyn GenericRecord, name: &str) -> Result<Option<FieldValue>, FieldError> {
    if let Some(kind) = record.field_kind(name) {
        match record.read_field(name, kind) {
            Ok(field) => return Ok(Some(field)),
            // The record misreported its schema; fall through to probing.
            Err(e) if e.is_mismatch() => {}
            Err(e) => return Err(e),
        }
    }
    probe_field(record, name)
}

/// Try every kind in [`FieldKind::PROBE_ORDER`]; the first accepted wins.
fn probe_field(record: &dyn GenericRecord, name: &str) -> Result<Option<FieldValue>, FieldError> {
    for kind in FieldKind::PROBE_ORDER {
        match record.read_field(name, kind) {
            Ok(field) => return Ok(Some(field)),
            Err(e) if e.is_mismatch() => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

fn array<T>(items: Option<Vec<T>>, f: impl FnMut(T) -> Value) -> Value {
    match items {
        Some(items) => Value::Array(items.into_iter().map(f).collect()),
        None => Value::Null,
    }
}

/// Finite floats become numbers; NaN and infinities become their text so
/// the output stays representable as JSON.
fn float_value(f: f64) -> Value {
    if f.is_finite() {
        Value::Float(f)
    } else {
        Value::String(f.to_string())
    }
}

/// Widen through the shortest decimal text so `1.1f32` reads as `1.1`.
fn float32_value(f: f32) -> Value {
    match f.to_string().parse::<f64>() {
        Ok(wide) => float_value(wide),
        Err(_) => float_value(f as f64),
    }
}

fn iso_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn iso_offset_timestamp(ts: DateTime<FixedOffset>) -> String {
    ts.to_rfc3339()
}

fn unsupported(type_name: &str) -> Value {
    let mut map = BTreeMap::new();
    map.insert(TYPE_KEY.to_string(), Value::String(type_name.to_string()));
    map.insert(
        ERROR_KEY.to_string(),
        Value::String(format!(
            "Unsupported value type {}. Supported formats are JSON text, generic records, \
             primitives (boolean, number, string), maps and sequences",
            type_name
        )),
    );
    Value::Map(map)
}
