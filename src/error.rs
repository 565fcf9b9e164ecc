//! Error types for the label sheet renderer
//!
//! An empty record list is not an error: generation reports it as `Ok(None)`.
//! A missing font is not an error either, it is recovered by falling back to
//! the built-in base fonts when the font set is loaded.

use thiserror::Error;

/// Custom error type for label sheet operations
#[derive(Error, Debug)]
pub enum LabelError {
    /// The sheet geometry leaves no room for a single label cell.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Invalid value for field '{0}': {1}")]
    InvalidValue(String, String),
}

/// Result type alias for label sheet operations
pub type LabelResult<T> = Result<T, LabelError>;

/// Conversion from LabelError to PyErr
#[cfg(feature = "python")]
impl From<LabelError> for pyo3::PyErr {
    fn from(err: LabelError) -> Self {
        pyo3::PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }
}

/// Helper to convert serde_json errors
impl From<serde_json::Error> for LabelError {
    fn from(err: serde_json::Error) -> Self {
        LabelError::JsonError(err.to_string())
    }
}
