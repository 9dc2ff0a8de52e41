//! kvgrid value layer
//!
//! The two value universes the rest of the workspace converts between:
//! - `Value`: the canonical, JSON-compatible tree callers see
//! - `NativeValue`: what the store actually holds (JSON text, primitives,
//!   containers, generic records, opaque objects)
//! - `GenericRecord`: schema-based records read field-by-field by kind
//! - `Codec`: text <-> `Value`
//!
//! # Example
//!
//! ```rust
//! use kvgrid_value::{NativeValue, Value};
//!
//! let stored = NativeValue::json("{\"name\":\"Alice\"}");
//! assert!(stored.as_json().is_some());
//!
//! let canonical = Value::from("Alice");
//! assert_eq!(canonical.as_str(), Some("Alice"));
//! ```

mod codec;
mod error;
mod native;
mod record;
mod value;

pub use codec::Codec;
pub use error::{Error, Result};
pub use native::{JsonText, NativeValue, Opaque};
pub use record::{
    CompactRecord, CompactRecordBuilder, FieldError, FieldKind, FieldValue, GenericRecord,
};
pub use value::Value;

pub use chrono;
pub use rust_decimal;
