//! Error types for the model library.

use radial_model::RadialModelError;
use thiserror::Error;

/// Errors that can occur while opening or querying a library.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// None of the conventional file names exist in the library directory.
    #[error("no {what} file in {dir} (tried {tried})")]
    MissingFile {
        what: &'static str,
        dir: String,
        tried: String,
    },

    /// The time guide could not be parsed.
    #[error("invalid time guide {path}: {reason}")]
    InvalidTimeGuide { path: String, reason: String },

    /// A date that does not map to a day of the year.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A grid file failed to load.
    #[error(transparent)]
    Model(#[from] RadialModelError),

    /// Filesystem error.
    #[error("io error on {path}: {message}")]
    Io { path: String, message: String },

    /// The library was closed.
    #[error("library {0} is closed")]
    Closed(String),
}

impl LibraryError {
    /// Create an Io error for `path`.
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Create an InvalidTimeGuide error.
    pub fn time_guide(path: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        Self::InvalidTimeGuide {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;
