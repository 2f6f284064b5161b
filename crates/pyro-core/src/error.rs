//! Error types for pyro

use thiserror::Error;

/// The main error type for pyro operations
#[derive(Debug, Error)]
pub enum PyroError {
    #[error("Invalid emitter config: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Emitter not found: {0}")]
    EmitterNotFound(u64),
}

/// Result type alias for pyro operations
pub type Result<T> = std::result::Result<T, PyroError>;

impl From<toml::de::Error> for PyroError {
    fn from(err: toml::de::Error) -> Self {
        PyroError::TomlParseError(err.to_string())
    }
}
