//! Error types for faqbot.

use thiserror::Error;

/// Library-level error type for faqbot operations.
#[derive(Error, Debug)]
pub enum FaqbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credentials: environment variable {0} is not set")]
    MissingCredentials(String),

    #[error("Failed to read document {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for faqbot operations.
pub type Result<T> = std::result::Result<T, FaqbotError>;
