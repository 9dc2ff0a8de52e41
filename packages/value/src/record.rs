//! Generic records - self-describing, schema-based store values.
//!
//! A record exposes its field names, but not necessarily the kind of each
//! field. Readers ask for a field *as* a particular kind; asking for the
//! wrong kind fails with [`FieldError::TypeMismatch`]. A reader that does not
//! know the kind has to try kinds until one is accepted.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use thiserror::Error;

/// The fixed universe of field kinds a record can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Int32,
    Int64,
    Float64,
    Float32,
    Boolean,
    Int16,
    Int8,
    Record,
    StringArray,
    Int32Array,
    Int64Array,
    Float64Array,
    BooleanArray,
    RecordArray,
    NullableBoolean,
    NullableInt32,
    NullableInt64,
    NullableFloat64,
    Decimal,
    Time,
    Date,
    Timestamp,
    TimestampWithTimezone,
}

impl FieldKind {
    /// Order in which kinds are tried when a record cannot report them.
    ///
    /// Strings come first because JSON-originated records are mostly strings.
    /// Any order that covers every kind is correct; this one is cheapest on
    /// typical data.
    pub const PROBE_ORDER: [FieldKind; 24] = [
        FieldKind::String,
        FieldKind::Int32,
        FieldKind::Int64,
        FieldKind::Float64,
        FieldKind::Float32,
        FieldKind::Boolean,
        FieldKind::Int16,
        FieldKind::Int8,
        FieldKind::Record,
        FieldKind::StringArray,
        FieldKind::Int32Array,
        FieldKind::Int64Array,
        FieldKind::Float64Array,
        FieldKind::BooleanArray,
        FieldKind::RecordArray,
        FieldKind::NullableBoolean,
        FieldKind::NullableInt32,
        FieldKind::NullableInt64,
        FieldKind::NullableFloat64,
        FieldKind::Decimal,
        FieldKind::Time,
        FieldKind::Date,
        FieldKind::Timestamp,
        FieldKind::TimestampWithTimezone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Float64 => "float64",
            FieldKind::Float32 => "float32",
            FieldKind::Boolean => "boolean",
            FieldKind::Int16 => "int16",
            FieldKind::Int8 => "int8",
            FieldKind::Record => "record",
            FieldKind::StringArray => "string[]",
            FieldKind::Int32Array => "int32[]",
            FieldKind::Int64Array => "int64[]",
            FieldKind::Float64Array => "float64[]",
            FieldKind::BooleanArray => "boolean[]",
            FieldKind::RecordArray => "record[]",
            FieldKind::NullableBoolean => "boolean?",
            FieldKind::NullableInt32 => "int32?",
            FieldKind::NullableInt64 => "int64?",
            FieldKind::NullableFloat64 => "float64?",
            FieldKind::Decimal => "decimal",
            FieldKind::Time => "time",
            FieldKind::Date => "date",
            FieldKind::Timestamp => "timestamp",
            FieldKind::TimestampWithTimezone => "timestamp-with-timezone",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field read out of a record, tagged with its kind.
///
/// Reference-typed kinds are optional: a record may hold `null` for them.
#[derive(Clone, Debug)]
pub enum FieldValue {
    String(Option<String>),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Float32(f32),
    Boolean(bool),
    Int16(i16),
    Int8(i8),
    Record(Option<Arc<dyn GenericRecord>>),
    StringArray(Option<Vec<Option<String>>>),
    Int32Array(Option<Vec<i32>>),
    Int64Array(Option<Vec<i64>>),
    Float64Array(Option<Vec<f64>>),
    BooleanArray(Option<Vec<bool>>),
    RecordArray(Option<Vec<Option<Arc<dyn GenericRecord>>>>),
    NullableBoolean(Option<bool>),
    NullableInt32(Option<i32>),
    NullableInt64(Option<i64>),
    NullableFloat64(Option<f64>),
    Decimal(Option<Decimal>),
    Time(Option<NaiveTime>),
    Date(Option<NaiveDate>),
    Timestamp(Option<NaiveDateTime>),
    TimestampWithTimezone(Option<DateTime<FixedOffset>>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Int32(_) => FieldKind::Int32,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::Float64(_) => FieldKind::Float64,
            FieldValue::Float32(_) => FieldKind::Float32,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Int16(_) => FieldKind::Int16,
            FieldValue::Int8(_) => FieldKind::Int8,
            FieldValue::Record(_) => FieldKind::Record,
            FieldValue::StringArray(_) => FieldKind::StringArray,
            FieldValue::Int32Array(_) => FieldKind::Int32Array,
            FieldValue::Int64Array(_) => FieldKind::Int64Array,
            FieldValue::Float64Array(_) => FieldKind::Float64Array,
            FieldValue::BooleanArray(_) => FieldKind::BooleanArray,
            FieldValue::RecordArray(_) => FieldKind::RecordArray,
            FieldValue::NullableBoolean(_) => FieldKind::NullableBoolean,
            FieldValue::NullableInt32(_) => FieldKind::NullableInt32,
            FieldValue::NullableInt64(_) => FieldKind::NullableInt64,
            FieldValue::NullableFloat64(_) => FieldKind::NullableFloat64,
            FieldValue::Decimal(_) => FieldKind::Decimal,
            FieldValue::Time(_) => FieldKind::Time,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::TimestampWithTimezone(_) => FieldKind::TimestampWithTimezone,
        }
    }
}

/// Failure to read a record field.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field exists but does not hold the requested kind.
    #[error("field '{field}' is not of kind {requested}")]
    TypeMismatch { field: String, requested: FieldKind },

    /// The field could not be read at all.
    #[error("field '{field}' is unreadable: {reason}")]
    Unreadable { field: String, reason: String },
}

impl FieldError {
    pub fn mismatch(field: impl Into<String>, requested: FieldKind) -> Self {
        FieldError::TypeMismatch {
            field: field.into(),
            requested,
        }
    }

    pub fn unreadable(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FieldError::Unreadable {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, FieldError::TypeMismatch { .. })
    }
}

/// A schema-based record whose field kinds may not be known to the reader.
///
/// # Object Safety
///
/// This trait is object-safe: records travel as `Arc<dyn GenericRecord>`.
pub trait GenericRecord: Send + Sync {
    /// Name of the record's schema or implementing type.
    fn type_name(&self) -> &str;

    /// Names of all fields, in schema order.
    fn field_names(&self) -> Vec<String>;

    /// The kind of a field, when the record can report it.
    ///
    /// Records that cannot introspect their schema leave this as `None`, and
    /// readers fall back to probing with [`read_field`](Self::read_field).
    fn field_kind(&self, _name: &str) -> Option<FieldKind> {
        None
    }

    /// Read a field as the given kind.
    fn read_field(&self, name: &str, kind: FieldKind) -> Result<FieldValue, FieldError>;
}

impl fmt::Debug for dyn GenericRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericRecord")
            .field("type_name", &self.type_name())
            .field("fields", &self.field_names())
            .finish()
    }
}

/// An in-memory record with a fixed, introspectable schema.
///
/// # Example
///
/// ```rust
/// use kvgrid_value::{CompactRecord, FieldKind, GenericRecord};
///
/// let person = CompactRecord::builder("Person")
///     .string("name", "Alice")
///     .int32("age", 30)
///     .build();
///
/// assert_eq!(person.field_names(), vec!["name", "age"]);
/// assert_eq!(person.field_kind("age"), Some(FieldKind::Int32));
/// ```
#[derive(Clone, Debug)]
pub struct CompactRecord {
    type_name: String,
    fields: Vec<(String, FieldValue)>,
}

impl CompactRecord {
    pub fn builder(type_name: impl Into<String>) -> CompactRecordBuilder {
        CompactRecordBuilder {
            record: CompactRecord {
                type_name: type_name.into(),
                fields: Vec::new(),
            },
        }
    }

    fn lookup(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

impl GenericRecord for CompactRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.lookup(name).map(FieldValue::kind)
    }

    fn read_field(&self, name: &str, kind: FieldKind) -> Result<FieldValue, FieldError> {
        let value = self
            .lookup(name)
            .ok_or_else(|| FieldError::unreadable(name, "no such field in schema"))?;
        if value.kind() != kind {
            return Err(FieldError::mismatch(name, kind));
        }
        Ok(value.clone())
    }
}

/// Builder for [`CompactRecord`]. Later fields with the same name replace
/// earlier ones in place.
pub struct CompactRecordBuilder {
    record: CompactRecord,
}

impl CompactRecordBuilder {
    /// Add a field with an explicit value.
    pub fn field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        let name = name.into();
        match self.record.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = value,
            None => self.record.fields.push((name, value)),
        }
        self
    }

    pub fn string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(name, FieldValue::String(Some(value.into())))
    }

    pub fn int32(self, name: impl Into<String>, value: i32) -> Self {
        self.field(name, FieldValue::Int32(value))
    }

    pub fn int64(self, name: impl Into<String>, value: i64) -> Self {
        self.field(name, FieldValue::Int64(value))
    }

    pub fn float64(self, name: impl Into<String>, value: f64) -> Self {
        self.field(name, FieldValue::Float64(value))
    }

    pub fn boolean(self, name: impl Into<String>, value: bool) -> Self {
        self.field(name, FieldValue::Boolean(value))
    }

    pub fn record(self, name: impl Into<String>, value: impl GenericRecord + 'static) -> Self {
        self.field(name, FieldValue::Record(Some(Arc::new(value))))
    }

    pub fn build(self) -> CompactRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_order_covers_every_kind_once() {
        let mut seen = std::collections::HashSet::new();
        for kind in FieldKind::PROBE_ORDER {
            assert!(seen.insert(kind), "{} listed twice", kind);
        }
        assert_eq!(seen.len(), 24);
        assert_eq!(FieldKind::PROBE_ORDER[0], FieldKind::String);
    }

    #[test]
    fn compact_record_rejects_wrong_kind() {
        let record = CompactRecord::builder("Person").int32("age", 30).build();

        let err = record.read_field("age", FieldKind::String).unwrap_err();
        assert!(err.is_mismatch());

        let value = record.read_field("age", FieldKind::Int32).unwrap();
        assert!(matches!(value, FieldValue::Int32(30)));
    }

    #[test]
    fn compact_record_missing_field_is_unreadable() {
        let record = CompactRecord::builder("Empty").build();
        let err = record.read_field("nope", FieldKind::String).unwrap_err();
        assert!(!err.is_mismatch());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn builder_replaces_duplicate_fields_in_place() {
        let record = CompactRecord::builder("T")
            .string("a", "x")
            .int64("b", 1)
            .boolean("a", true)
            .build();

        assert_eq!(record.field_names(), vec!["a", "b"]);
        assert_eq!(record.field_kind("a"), Some(FieldKind::Boolean));
    }
}
