use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, PreprocessingError>;
