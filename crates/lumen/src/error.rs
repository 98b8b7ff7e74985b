//! Error types for Lumen.

use std::path::PathBuf;

/// Result type alias for Lumen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading settings or building data items.
///
/// Binding misuse is not reported here: an out-of-range insert index is a
/// programming error and panics, while tolerated races (removing an unknown
/// item, mutating a closed binding) are logged and ignored.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to read settings '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("Settings parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("Settings serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting parsed but holds an unusable value.
    #[error("Invalid value for setting '{setting}': {message}")]
    InvalidSetting { setting: String, message: String },

    /// Pixel data length does not match the declared shape.
    #[error("Data of length {len} does not match shape {rows}x{columns}")]
    ShapeMismatch {
        rows: usize,
        columns: usize,
        len: usize,
    },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid setting error.
    pub fn invalid_setting(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting: setting.into(),
            message: message.into(),
        }
    }
}
