//! Error types for the host application.

use thiserror::Error;

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

/// Host-side errors. None of them touches game state; they are surfaced
/// where they happen and the session keeps running.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("OpenAI API key is not configured - add it in settings first")]
    MissingApiKey,

    #[error("OpenAI error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Audio error: {0}")]
    Audio(String),
}
