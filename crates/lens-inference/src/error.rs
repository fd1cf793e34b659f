//! Inference error types.

use std::time::Duration;

use thiserror::Error;

pub type InferenceResult<T> = Result<T, InferenceError>;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Inference service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Label set error: {0}")]
    Labels(String),

    #[error("Sentiment lexicon error: {0}")]
    Lexicon(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InferenceError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InferenceError::ServiceUnavailable(_)
                | InferenceError::Timeout(_)
                | InferenceError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(InferenceError::ServiceUnavailable("502".into()).is_retryable());
        assert!(InferenceError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!InferenceError::invalid_response("bad shape").is_retryable());
        assert!(!InferenceError::RequestFailed("400".into()).is_retryable());
    }
}
