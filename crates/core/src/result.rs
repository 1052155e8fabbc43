// crates/core/src/result.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("External NLU error: {0}")]
    ExternalNlu(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type CampusResult<T> = Result<T, CampusError>;
