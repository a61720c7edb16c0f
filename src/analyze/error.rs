use thiserror::Error;

use beacon_analyzer::error::{error_codes, EngineError, ErrorResponse};

use crate::config::ConfigError;

/// Main error type for the analyze binary
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Convert error to the JSON payload written on failure
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            AppError::Config(e) => ErrorResponse::new(error_codes::CONFIG_ERROR, e.to_string()),
            AppError::Engine(e) => e.to_response(),
            AppError::Io { .. } => ErrorResponse::new(error_codes::IO_ERROR, self.to_string()),
        }
    }
}
