use thiserror::Error;

pub type Result<T> = std::result::Result<T, InferenceError>;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Batch length mismatch: expected {expected} results, got {actual}")]
    BatchLengthMismatch { expected: usize, actual: usize },

    #[error("Batch of {actual} texts exceeds model limit of {limit}")]
    BatchTooLarge { limit: usize, actual: usize },

    #[error("Model error: {message}")]
    Model { message: String },
}

impl InferenceError {
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }
}
