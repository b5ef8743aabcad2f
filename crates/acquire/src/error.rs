use thiserror::Error;

/// Errors surfaced while turning an [`ImageRef`](crate::ImageRef) into a bitmap.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AcquireError {
    /// Inline data is not valid base64, or the bytes are not a supported image.
    #[error("Failed to decode image: {0}")]
    Decode(String),
    /// The remote URL timed out, answered with a non-success status, or was unreachable.
    #[error("Failed to fetch image from {url}: {reason}")]
    Fetch { url: String, reason: String },
    /// The HTTP client could not be constructed.
    #[error("invalid fetcher configuration: {0}")]
    Client(String),
}

impl AcquireError {
    pub(crate) fn fetch(url: &str, reason: impl Into<String>) -> Self {
        AcquireError::Fetch {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_message() {
        let err = AcquireError::Decode("invalid base64".into());
        assert_eq!(err.to_string(), "Failed to decode image: invalid base64");
    }

    #[test]
    fn fetch_message_names_url() {
        let err = AcquireError::fetch("http://example.invalid/x.jpg", "timed out");
        let msg = err.to_string();
        assert!(msg.contains("http://example.invalid/x.jpg"));
        assert!(msg.contains("timed out"));
    }
}
