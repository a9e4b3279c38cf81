//! Error types for the codenum conversion layer.
//!
//! All public APIs return `CodenumResult<T>`; library code does not panic.
//! Decoding an unrecognized persisted value is not an error; see
//! [`crate::registry::EnumRegistry::register_unknown_by_name`].

use thiserror::Error;

/// Unified error type for all codenum operations.
#[derive(Debug, Error)]
pub enum CodenumError {
    /// A field binding could not determine its strategy or representation
    #[error("configuration error for enum '{enum_type}': {message}")]
    Configuration { enum_type: String, message: String },

    /// The referenced enum type was never declared to the registry
    #[error("enum type '{0}' not found")]
    UnknownEnumType(String),

    /// An operation was invoked on a field type that was never bound
    #[error("enum type ({0}) not properly, fully configured")]
    NotConfigured(String),

    /// Relational value family does not match the bound codec
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Row position beyond what a row buffer can address
    #[error("row position {0} is out of range")]
    InvalidPosition(usize),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Standard I/O error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CodenumError {
    /// Shorthand for a configuration error naming the enum type.
    pub fn configuration(enum_type: impl Into<String>, message: impl Into<String>) -> Self {
        CodenumError::Configuration {
            enum_type: enum_type.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for all codenum operations.
pub type CodenumResult<T> = Result<T, CodenumError>;

impl From<serde_json::Error> for CodenumError {
    fn from(err: serde_json::Error) -> Self {
        CodenumError::Serialization(err.to_string())
    }
}
