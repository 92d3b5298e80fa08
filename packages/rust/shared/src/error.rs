//! Error types for seopress.
//!
//! Library crates use [`SeoPressError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level error type for all seopress operations.
#[derive(Debug, thiserror::Error)]
pub enum SeoPressError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The generation provider failed (network, auth, rate limit, provider error).
    #[error("generation error: {0}")]
    Generation(String),

    /// Generated output was unusable (empty text, invalid or wrongly shaped JSON).
    #[error("malformed output: {message}")]
    MalformedOutput { message: String },

    /// A single generation call exceeded its time budget.
    #[error("{task} timed out after {after:?}")]
    Timeout { task: &'static str, after: Duration },

    /// HTTP transport error talking to a provider.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad record, invalid URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Failure while composing the enriched record, outside any task.
    #[error("orchestration error: {0}")]
    Orchestration(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SeoPressError>;

impl SeoPressError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-output error from any displayable message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedOutput {
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
