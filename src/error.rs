// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hub request failed with status {status}: {message}")]
    Hub { status: u16, message: String },

    #[error("Record stream error: {0}")]
    Stream(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl PipelineError {
    pub fn hub(status: u16, message: impl Into<String>) -> Self {
        Self::Hub {
            status,
            message: message.into(),
        }
    }
}
