//! Error types for radial grid loading.

use thiserror::Error;

/// Errors that can occur while reading or building a radial grid model.
#[derive(Error, Debug)]
pub enum RadialModelError {
    /// The byte stream ended in the middle of a record.
    #[error("truncated grid stream: {0}")]
    Truncated(String),

    /// The period label is longer than the configured cap.
    #[error("label length {len} exceeds maximum {max}")]
    LabelTooLong { len: usize, max: usize },

    /// A length field in the stream is negative.
    #[error("negative {field} length {len}")]
    NegativeLength { field: &'static str, len: i32 },

    /// Spokes are not evenly spaced in azimuth.
    #[error("azimuth spacing is not constant at spoke {spoke}: expected {expected}, found {found}")]
    NonUniformAzimuth {
        spoke: usize,
        expected: f64,
        found: f64,
    },

    /// Spokes do not share a radial step.
    #[error("radial spacing is not constant at spoke {spoke}: expected {expected}, found {found}")]
    NonUniformDelta {
        spoke: usize,
        expected: f64,
        found: f64,
    },

    /// A spacing that cannot describe a grid (zero, negative or NaN).
    #[error("invalid {what} {value}")]
    InvalidSpacing { what: &'static str, value: f64 },

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A load failure annotated with the file it came from.
    #[error("failed to load radial grid {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: Box<RadialModelError>,
    },
}

impl RadialModelError {
    /// Create a Truncated error.
    pub fn truncated(msg: impl Into<String>) -> Self {
        Self::Truncated(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Attach the path of the file being loaded.
    pub fn at(self, path: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<std::io::Error> for RadialModelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for radial model operations.
pub type Result<T> = std::result::Result<T, RadialModelError>;
