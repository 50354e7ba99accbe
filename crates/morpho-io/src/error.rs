//! Error types for persistence operations.

use thiserror::Error;

/// Errors that can occur reading or writing analysis artifacts.
#[derive(Debug, Error)]
pub enum IoError {
    /// The file parsed but does not follow the expected schema.
    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    /// JSON syntax error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML generation failure.
    #[error("XML error: {0}")]
    Xml(String),
}

impl IoError {
    /// Create a format mismatch error with a descriptive message.
    #[must_use]
    pub fn format_mismatch(message: impl Into<String>) -> Self {
        Self::FormatMismatch(message.into())
    }

    /// Create an XML error with a descriptive message.
    #[must_use]
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }
}

/// Result type for persistence operations.
pub type IoResult<T> = Result<T, IoError>;
