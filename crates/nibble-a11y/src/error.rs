//! Error types for the accessibility engine.
//!
//! The engine's interactive operations never fail: malformed input degrades
//! to a safe default. These errors cover the fallible ambient APIs around it
//! (configuration loading, strict color parsing).

use std::path::PathBuf;

use nibble_core::ColorParseError;

/// Result type alias for accessibility engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the accessibility engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration parsing error.
    #[error("Invalid accessibility configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration serialization error.
    #[error("Failed to serialize accessibility configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// File I/O error.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Color parsing error.
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
