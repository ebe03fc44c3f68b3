//! Error types for the operations layer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors that can occur during operations.
///
/// Tag and Dockerfile violations are not errors; they come back as reports.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Creating a directory or writing a scaffold target failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template could not be rendered.
    #[error("Failed to render template for {path}: {message}")]
    Render { path: PathBuf, message: String },

    /// The plan document is not a usable plan.
    #[error("Invalid plan document {path}: {message}")]
    PlanParse { path: PathBuf, message: String },

    /// Nothing to check at the given path.
    #[error("No Dockerfile found at {path}")]
    DockerfileNotFound { path: PathBuf },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Path resolution error.
    #[error("Failed to resolve path {path}: {message}")]
    PathResolution { path: PathBuf, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context.
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl OpsError {
    /// Create a new error with additional context.
    pub fn with_context(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a path resolution error.
    pub fn path_resolution(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::PathResolution {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap an IO failure for a specific scaffold target.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
