//! The ValueBridge handle shared by every tool.

use std::fmt;
use std::sync::Arc;

use kvgrid_value::Codec;

use crate::JsonCodec;

/// Converts store-native values to canonical Values and back.
///
/// The bridge holds nothing but its codec, so a single instance can be
/// cloned freely and used from any number of threads.
///
/// # Example
///
/// ```rust
/// use kvgrid_bridge::ValueBridge;
/// use kvgrid_value::{NativeValue, Value};
///
/// let bridge = ValueBridge::json();
///
/// let stored = bridge.encode(&Value::from("hello")).unwrap();
/// assert_eq!(stored, NativeValue::json("\"hello\""));
/// assert_eq!(bridge.decode(&stored), Value::from("hello"));
/// ```
#[derive(Clone)]
pub struct ValueBridge {
    codec: Arc<dyn Codec>,
}

impl ValueBridge {
    /// Create a bridge around an explicit codec.
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    /// Create a bridge using [`JsonCodec`].
    pub fn json() -> Self {
        Self::new(Arc::new(JsonCodec))
    }

    /// The codec this bridge parses and renders JSON text with.
    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }
}

impl Default for ValueBridge {
    fn default() -> Self {
        Self::json()
    }
}

impl fmt::Debug for ValueBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBridge").finish_non_exhaustive()
    }
}
