use thiserror::Error;

/// Errors surfaced by an [`EmbeddingProvider`](crate::EmbeddingProvider).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmbeddingError {
    /// Configuration is inconsistent (e.g., api mode without an `api_url`).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    /// The remote endpoint could not be reached or answered with an error status.
    #[error("embedding request failed: {0}")]
    Request(String),
    /// The model produced no output, or output that is not a usable vector.
    #[error("inference failure: {0}")]
    Inference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_config() {
        let err = EmbeddingError::InvalidConfig("api_url is required".into());
        assert!(err.to_string().contains("invalid embedding config"));
        assert!(err.to_string().contains("api_url is required"));
    }

    #[test]
    fn error_request() {
        let err = EmbeddingError::Request("HTTP error 503".into());
        assert!(err.to_string().contains("embedding request failed"));
    }

    #[test]
    fn error_inference() {
        let err = EmbeddingError::Inference("empty vector".into());
        assert!(err.to_string().contains("inference failure"));
        assert!(err.to_string().contains("empty vector"));
    }
}
