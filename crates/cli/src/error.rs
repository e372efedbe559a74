//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Track file not found
    #[error("Track file not found: {path}")]
    InputNotFound { path: String },

    /// Track file could not be decoded
    #[error("Malformed track file {path}: {message}")]
    MalformedTrackFile { path: String, message: String },

    /// Some tracks could not be repaired
    #[error("{failed} of {total} tracks failed to repair")]
    TracksFailed { failed: usize, total: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn input_not_found(path: impl Into<String>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    pub fn malformed_track_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedTrackFile {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
