//! Error taxonomy shared by the typed accessors and the JSON codec.

use crate::value::ValueKind;

/// Errors returned by typed map accessors and by the JSON codec.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A typed getter was asked for a key the map does not hold.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// The stored value is not of the requested kind.
    #[error("type mismatch for key {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The key that was looked up.
        key: String,
        /// The kind the caller asked for.
        expected: ValueKind,
        /// The kind actually stored.
        actual: ValueKind,
    },

    /// An integer getter found a number with no exact integer representation.
    #[error("value for key {key} is not an integer: {value}")]
    NotIntegral {
        /// The key that was looked up.
        key: String,
        /// The stored number.
        value: f64,
    },

    /// A value cannot be represented in JSON.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The input is not a well-formed JSON object.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The decoder met well-formed JSON it cannot place in a map.
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
