//! Error types for flapboard.
//!
//! Unknown characters are never errors; they render as blanks. What can
//! fail is loading configuration and driving the terminal.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the library and the binary.
#[derive(Debug, Error)]
pub enum FlapboardError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal or output I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization failed.
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for FlapboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<toml::ser::Error> for FlapboardError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FlapboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_transparent() {
        let err: FlapboardError = ConfigError::InvalidLineLength(0).into();
        assert_eq!(err.to_string(), ConfigError::InvalidLineLength(0).to_string());
    }

    #[test]
    fn test_io_error_message() {
        let err: FlapboardError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert_eq!(err.to_string(), "IO error: boom");
    }
}
