//! Error types for Rulebook.
//!
//! Library crates use [`RulebookError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Rulebook operations.
#[derive(Debug, thiserror::Error)]
pub enum RulebookError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Manifest loading or parsing error.
    #[error("manifest error: {message}")]
    Manifest { message: String },

    /// A rule file whose front matter block is missing or unparseable.
    #[error("malformed rule '{id}': {message}")]
    MalformedFragment { id: String, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RulebookError>;

impl RulebookError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a manifest error from any displayable message.
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest {
            message: msg.into(),
        }
    }

    /// Create a malformed-rule error for the given fragment id.
    pub fn malformed(id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MalformedFragment {
            id: id.into(),
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
