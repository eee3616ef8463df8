//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while preparing regression test data
#[derive(Debug, Error)]
pub enum TestError {
    /// A library call rejected test input
    #[error("library error: {0}")]
    Rapp(#[from] rapp_core::Error),

    /// Value comparison failed
    #[error(
        "value comparison failed at index {index}: expected {expected}, got {actual}, delta {delta}"
    )]
    ValueMismatch {
        index: usize,
        expected: f64,
        actual: f64,
        delta: f64,
    },

    /// Bitmap comparison failed
    #[error("bitmap comparison failed at index {index}: first difference at ({x}, {y})")]
    BitmapMismatch { index: usize, x: usize, y: usize },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
