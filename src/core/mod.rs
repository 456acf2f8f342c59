use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

use crate::eval::EvalError;
use crate::value::Key;

/// Error types for preference store operations.
///
/// Every failure carries the key, module or location it concerns so that
/// callers can report it without extra context.
#[derive(Error, Debug)]
pub enum PrefError {
    /// Caller input was rejected before any I/O happened
    #[error("invalid preferences: {reason}")]
    Validation {
        /// Why the input was rejected
        reason: String,
    },

    /// Writing the disposable pre-flight file or the real document failed
    #[error("failed to persist preferences to '{path}': {details}")]
    Persist {
        /// Path that could not be written
        path: PathBuf,
        /// Underlying failure
        details: String,
    },

    /// An existing document could not be parsed or lacks a required collection
    #[error("'{location}' is not a valid preferences document: {details}")]
    Format {
        /// Document path, or "string" for in-memory text
        location: String,
        /// Parse or structure error details
        details: String,
    },

    /// A dynamic entry could not be evaluated
    #[error("failed to evaluate dynamic preference {key}: {source}")]
    Evaluation {
        /// Key of the dynamic entry
        key: Key,
        /// What went wrong during import or evaluation
        #[source]
        source: EvalError,
    },

    /// The command-line configuration file is malformed
    #[error("failed to load configuration from '{location}': {details}")]
    ConfigFile {
        /// Path of the configuration file
        location: String,
        /// Parse error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for preference store operations.
pub type Result<T> = result::Result<T, PrefError>;

impl PrefError {
    /// Creates a validation error from any displayable reason.
    pub fn validation(reason: impl fmt::Display) -> Self {
        PrefError::Validation {
            reason: reason.to_string(),
        }
    }

    /// Creates a persistence error for the given path.
    pub fn persist(error: impl fmt::Display, path: &Path) -> Self {
        PrefError::Persist {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }

    /// Creates a format error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the document that failed to parse
    pub fn format(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        PrefError::Format {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an evaluation error for a dynamic key.
    pub fn evaluation(key: &Key, source: EvalError) -> Self {
        PrefError::Evaluation {
            key: key.clone(),
            source,
        }
    }

    /// Creates a configuration file error.
    pub fn config_file(error: impl fmt::Display, path: &Path) -> Self {
        PrefError::ConfigFile {
            location: path.to_string_lossy().to_string(),
            details: error.to_string(),
        }
    }
}
