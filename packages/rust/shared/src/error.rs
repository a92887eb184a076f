//! Error types for Storyboard.
//!
//! Library crates use [`StoryboardError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Content-shape problems (missing title, empty sections) are never errors;
//! they degrade to a smaller document. Only I/O, config and serialization
//! failures surface here.

use std::path::PathBuf;

/// Top-level error type for all Storyboard operations.
#[derive(Debug, thiserror::Error)]
pub enum StoryboardError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error (unreadable source, unwritable artifact).
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unrecognized user-supplied value (policy name, format name).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Data validation error (empty marker, invalid export name, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Artifact serialization error.
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StoryboardError>;

impl StoryboardError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for StoryboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}
