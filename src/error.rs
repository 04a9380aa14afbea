//! Error types for AI-Agno
//!
//! Uses `thiserror` for the library error enum. The binary wraps these in
//! `anyhow` at the top level.

use thiserror::Error;

/// The primary error type for AI-Agno operations.
#[derive(Error, Debug)]
pub enum AgnoError {
    /// Configuration errors (bad interval, malformed config file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Subscriber installation failures
    #[error("Logging error: {0}")]
    Logging(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for AI-Agno operations.
pub type Result<T> = std::result::Result<T, AgnoError>;
