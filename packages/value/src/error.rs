//! Error types for the value layer.

use thiserror::Error;

/// Errors raised while moving values between representations.
///
/// Decoding store-native values never produces these; the decoder degrades
/// instead. They come from codecs and from the encoder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Codec failed to parse text into a Value.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A Value could not be serialized.
    #[error("encode error: {message}")]
    Encode { message: String },

    /// Generic error with message.
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Error::Other {
            message: message.into(),
        }
    }
}

/// Result type alias for value-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let e = Error::decode("unexpected token");
        let display = e.to_string();
        assert!(display.contains("decode error"));
        assert!(display.contains("unexpected token"));
    }

    #[test]
    fn encode_error_display() {
        let e = Error::encode("NaN is not JSON");
        assert_eq!(e.to_string(), "encode error: NaN is not JSON");
    }

    #[test]
    fn other_error_display() {
        assert_eq!(Error::other("boom").to_string(), "boom");
    }
}
