//! Error taxonomy for a generation run.
//!
//! Every failure surfaces at the invocation boundary; nothing here is retried
//! and there is no rollback of a partially merged registry.

use std::path::PathBuf;
use thiserror::Error;

/// Failures a generation run can end with.
#[derive(Debug, Error)]
pub enum GenError {
    /// The requested target has no entry in the generator catalog.
    #[error("No generator options for unknown target: {0}")]
    UnknownTarget(String),

    /// A base or supplemental document could not be parsed.
    #[error("Failed to parse document {path:?}: {message}")]
    DocumentParse { path: PathBuf, message: String },

    /// A directory or file could not be read or written.
    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selected generator failed while producing output.
    #[error("Generation failed: {0:#}")]
    Generation(#[from] anyhow::Error),
}

impl GenError {
    /// Wrap an I/O error with the path it concerns.
    #[must_use]
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Wrap a parser message with the document path it concerns.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GenError::DocumentParse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias used across the orchestration layer.
pub type Result<T> = std::result::Result<T, GenError>;
