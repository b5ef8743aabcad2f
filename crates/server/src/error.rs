use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use matcher::MatchError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Payload too large: max {0}MB allowed")]
    PayloadTooLarge(usize),

    #[error("{0}")]
    Match(#[from] MatchError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::Match(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::Match(MatchError::MissingImage) => "MISSING_IMAGE",
            ServerError::Match(MatchError::Decode(_)) => "DECODE_ERROR",
            ServerError::Match(MatchError::Fetch(_)) => "FETCH_ERROR",
            ServerError::Match(MatchError::Embedding(_) | MatchError::EmptyQuery) => {
                "EMBEDDING_ERROR"
            }
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %message, "request failed");
        } else if status != StatusCode::NOT_FOUND {
            tracing::warn!(code = self.error_code(), error = %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
