//! Error handling for the resume matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document extension is not one the extractor understands.
    /// Callers should reject the upload before running the pipeline.
    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    /// The document could be opened but its content is unreadable or corrupt.
    #[error("Text extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, MatcherError>;

/// model2vec reports failures through anyhow
impl From<anyhow::Error> for MatcherError {
    fn from(err: anyhow::Error) -> Self {
        MatcherError::ModelLoading(err.to_string())
    }
}

impl From<candle_core::Error> for MatcherError {
    fn from(err: candle_core::Error) -> Self {
        MatcherError::Embedding(err.to_string())
    }
}
