//! Error types for pdfrag.
//!
//! A single error enum covers every failure category of the pipelines:
//! configuration, I/O, the LLM and embedding APIs, the vector store,
//! PDF parsing and prompt rendering.

use thiserror::Error;

/// Unified error type for pdfrag.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration and environment validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chat completion API errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding API errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store errors
    #[error("Vector store error: {0}")]
    Store(String),

    /// PDF loading and text extraction errors
    #[error("Document error: {0}")]
    Document(String),

    /// Prompt loading and rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Error raised when a required environment variable is unset or empty.
    pub fn missing_env(name: &str) -> Self {
        AppError::Config(format!("Environment variable {} is not set", name))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
