use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use acquire::ImageRef;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matcher::{MatchError, RankedResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Match request
///
/// Exactly one of the two fields is expected. When both are set, `image`
/// wins; empty strings count as absent.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MatchRequest {
    /// Base64 image data, optionally a `data:` URI
    #[serde(default)]
    pub image: Option<String>,

    /// Remote image URL (a `data:` URI is decoded without fetching)
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl MatchRequest {
    /// Validate the request into the reference the acquirer consumes.
    pub fn into_image_ref(self) -> Result<ImageRef, MatchError> {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

        if let Some(data) = non_empty(self.image) {
            return Ok(ImageRef::Inline(data));
        }
        if let Some(url) = non_empty(self.image_url) {
            return Ok(ImageRef::Remote(url));
        }
        Err(MatchError::MissingImage)
    }
}

/// Parse a raw request body.
///
/// A missing body, `null`, or an empty object is "No JSON data provided";
/// anything else that is not a match request is a bad request.
pub fn parse_match_request(body: &[u8]) -> ServerResult<MatchRequest> {
    let no_data = || ServerError::BadRequest("No JSON data provided".to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ServerError::BadRequest(format!("Invalid JSON: {e}")))?;

    let empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Err(no_data());
    }
    if !value.is_object() {
        return Err(ServerError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| ServerError::BadRequest(format!("Invalid request: {e}")))
}

/// Rank the catalog against the submitted image.
///
/// Returns up to `api_top_k` results, best first, with each `image` rewritten
/// to the URL the UI server serves it from. Every pipeline failure is a 400
/// with `{"error": message}`; an oversized body is a 413 with the same shape.
pub async fn match_products(
    State(state): State<Arc<ServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Json<Vec<RankedResult>>> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(state.config.max_body_size_mb)
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    })?;
    let image = parse_match_request(&body)?.into_image_ref()?;

    let mut results = state
        .matcher
        .match_image(&image, state.config.api_top_k)
        .await
        .inspect_err(|e| {
            tracing::error!(source = image.kind(), error = %e, "match request failed")
        })?;

    for result in &mut results {
        result.image_ref = state.asset_url(result.image_file_name());
    }
    Ok(Json(results))
}

/// Cross-origin pre-flight for `/api/match`.
///
/// Answered without touching the matcher. `Access-Control-Allow-Origin` is
/// added by the router-wide header layer.
pub async fn match_preflight() -> impl IntoResponse {
    (
        [
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
        ],
        Json(json!({ "status": "ok" })),
    )
}
