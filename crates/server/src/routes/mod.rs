//! Route handlers
//!
//! - `health`: liveness and catalog summary (API server)
//! - `matching`: image matching and its CORS pre-flight (API server)
//! - `ui`: search page, multipart search and gallery (UI server)

pub mod health;
pub mod matching;
pub mod ui;

use crate::error::ServerError;

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
