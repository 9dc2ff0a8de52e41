//! kvgrid Value Bridge
//!
//! Converts values held by the store into the canonical JSON-shaped `Value`
//! tree, and caller values back into the store's JSON-text encoding.
//!
//! - `ValueBridge::decode`: any `NativeValue` -> `Value`, never fails
//! - `ValueBridge::encode`: `Value` -> `NativeValue::Json`
//! - `JsonCodec`: the codec the bridge is normally built with
//!
//! # Example
//!
//! ```rust
//! use kvgrid_bridge::ValueBridge;
//! use kvgrid_value::{NativeValue, Value};
//!
//! let bridge = ValueBridge::json();
//!
//! let decoded = bridge.decode(&NativeValue::json("{\"name\":\"Alice\",\"age\":30}"));
//! assert_eq!(decoded.get("age"), Some(&Value::Integer(30)));
//!
//! // Text that is not JSON is still returned, as a string
//! let raw = bridge.decode(&NativeValue::json("not valid json{{{"));
//! assert_eq!(raw, Value::from("not valid json{{{"));
//! ```

mod bridge;
mod codec;
mod decode;
mod encode;

pub use bridge::ValueBridge;
pub use codec::{json_to_value, value_to_json, JsonCodec};
pub use decode::{DecodeIter, COMPACT_TYPE_KEY, ERROR_KEY, TYPE_KEY, UNKNOWN_FIELD_TYPE};

// Re-export value types for convenience
pub use kvgrid_value::{Codec, Error, NativeValue, Result, Value};
