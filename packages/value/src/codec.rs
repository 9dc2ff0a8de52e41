//! The Codec trait: text <-> Value.

use crate::{Result, Value};

/// Codec for converting between Value and its textual wire form.
///
/// The bridge never reaches for a global codec; one instance is built at
/// start-up and handed to everything that needs it.
///
/// # Implementing Custom Codecs
///
/// ```rust
/// use kvgrid_value::{Codec, Error, Result, Value};
///
/// struct UpperCaseStrings;
///
/// impl Codec for UpperCaseStrings {
///     fn decode(&self, text: &str) -> Result<Value> {
///         Ok(Value::String(text.to_uppercase()))
///     }
///
///     fn encode(&self, value: &Value) -> Result<String> {
///         value
///             .as_str()
///             .map(str::to_uppercase)
///             .ok_or_else(|| Error::encode("only strings are supported"))
///     }
/// }
/// ```
pub trait Codec: Send + Sync {
    /// Parse text into a Value.
    fn decode(&self, text: &str) -> Result<Value>;

    /// Serialize a Value into text.
    fn encode(&self, value: &Value) -> Result<String>;
}

impl<T: Codec + ?Sized> Codec for std::sync::Arc<T> {
    fn decode(&self, text: &str) -> Result<Value> {
        (**self).decode(text)
    }

    fn encode(&self, value: &Value) -> Result<String> {
        (**self).encode(value)
    }
}
