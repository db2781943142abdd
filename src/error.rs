//! Error definitions shared by every stage of route loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors that can occur while resolving and binding a route table.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A loader, adapter or route factory could not be resolved, or the
    /// configuration itself is invalid. Raised before any traversal starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A directory or file could not be read.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An endpoint module could not be evaluated.
    #[error("malformed module {}: {reason}", path.display())]
    MalformedModule { path: PathBuf, reason: String },

    /// The server refused a resolved route.
    #[error("cannot bind {method} {path}: {reason}")]
    Binding {
        method: String,
        path: String,
        reason: String,
    },
}

impl LoaderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedModule {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for LoaderError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result type for route loading operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
