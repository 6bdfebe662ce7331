//! Error types for Hinge

use thiserror::Error;

/// The main error type for Hinge operations
#[derive(Debug, Error)]
pub enum HingeError {
    #[error("Mover not found: {0}")]
    MoverNotFound(String),

    #[error("Duplicate mover name: {0}")]
    DuplicateMoverName(String),

    #[error("Level error: {0}")]
    LevelError(String),

    #[error("Invalid keyframe index: {index} (mover '{mover}' has {count} keyframes)")]
    InvalidKeyframeIndex {
        mover: String,
        index: usize,
        count: usize,
    },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Hinge operations
pub type Result<T> = std::result::Result<T, HingeError>;

impl From<toml::de::Error> for HingeError {
    fn from(err: toml::de::Error) -> Self {
        HingeError::TomlParseError(err.to_string())
    }
}
