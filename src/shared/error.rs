use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the aggregation engine and its input validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Start time {start} is after end time {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Bucket width must be one of 1min, 5min, 10min, 30min, 1H (got {0})")]
    InvalidBucketWidth(String),

    #[error("Target temperature must be between 50 and 150 °C (got {0})")]
    InvalidTarget(f64),

    #[error("Invalid reading at index {index}: {reason}")]
    InvalidReading { index: usize, reason: String },

    #[error("Failed to decode readings: {0}")]
    Decode(String),
}

impl EngineError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidRange { .. } => error_codes::INVALID_RANGE,
            EngineError::InvalidBucketWidth(_) => error_codes::INVALID_BUCKET_WIDTH,
            EngineError::InvalidTarget(_) => error_codes::INVALID_TARGET,
            EngineError::InvalidReading { .. } => error_codes::INVALID_READING,
            EngineError::Decode(_) => error_codes::DECODE_ERROR,
        }
    }

    /// Build the serializable payload for this error
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Decode(err.to_string())
    }
}

/// Standard error payload
/// Contains stable machine-readable error code and human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code (e.g., "INVALID_RANGE")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Common error codes used across the engine and the analyze binary
pub mod error_codes {
    // Validation errors
    pub const INVALID_RANGE: &str = "INVALID_RANGE";
    pub const INVALID_BUCKET_WIDTH: &str = "INVALID_BUCKET_WIDTH";
    pub const INVALID_TARGET: &str = "INVALID_TARGET";
    pub const INVALID_READING: &str = "INVALID_READING";

    // Input errors
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
}
