//! Error types for operating-mode discovery
//!
//! Provides a unified error type for all opmode crates. Only caller-contract
//! violations surface as errors; data-quality problems degrade to empty
//! results further up the stack.

use thiserror::Error;

/// Core error type for segmentation and mode detection
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// The dataset handed to the pipeline has no rows
    #[error("No data provided")]
    EmptyDataset,

    /// No setpoint/process-value pair was selected
    #[error("No SP/PV pairs selected")]
    NoPairsSelected,

    /// JSON (de)serialization failure for configuration or row input
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for a segment that does not fit the series
    pub fn segment_out_of_bounds(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidInput(format!(
            "Segment [{start}, {end}] is outside a series of length {len}"
        ))
    }
}
