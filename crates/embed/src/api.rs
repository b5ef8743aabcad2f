use std::io::Cursor;

use async_trait::async_trait;
use image::{ImageFormat, RgbImage};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::normalize::{l2_normalize_in_place, validate_vector};
use crate::{EmbedConfig, EmbeddingError, EmbeddingProvider};

/// Embeds images by POSTing PNG bytes to a remote feature-extraction endpoint.
///
/// Accepted response shapes: a flat `[f32]`, a nested `[[f32]]` (first row is
/// used), `{"embeddings": ...}` or `{"data": [{"embedding": [...]}]}`.
#[derive(Debug, Clone)]
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    model_name: String,
    normalize: bool,
}

impl ApiEmbedder {
    pub fn from_config(cfg: &EmbedConfig) -> Result<Self, EmbeddingError> {
        let url = cfg
            .api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| EmbeddingError::InvalidConfig("api_url is required for api mode".into()))?;
        let client = reqwest::Client::builder()
            .timeout(cfg.api_timeout())
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url,
            auth_header: cfg.api_auth_header.clone(),
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
        })
    }

    async fn send(&self, png: Vec<u8>) -> Result<Value, EmbeddingError> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "image/png");
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header(AUTHORIZATION, header);
        }

        let response = request
            .body(png)
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Request(format!("HTTP error {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| EmbeddingError::Inference(format!("Invalid JSON response: {e}")))
    }
}

#[async_trait]
impl EmbeddingProvider for ApiEmbedder {
    async fn embed(&self, image: &RgbImage) -> Result<Vec<f32>, EmbeddingError> {
        let png = encode_png(image)?;
        tracing::debug!(url = %self.url, bytes = png.len(), "requesting remote embedding");
        let response = self.send(png).await?;
        let mut vector = parse_embedding_response(response)?;
        validate_vector(&vector)?;
        if self.normalize {
            l2_normalize_in_place(&mut vector);
        }
        Ok(vector)
    }

    fn model_id(&self) -> &str {
        &self.model_name
    }
}

fn encode_png(image: &RgbImage) -> Result<Vec<u8>, EmbeddingError> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| EmbeddingError::Inference(format!("failed to encode query image: {e}")))?;
    Ok(out.into_inner())
}

fn parse_embedding_response(value: Value) -> Result<Vec<f32>, EmbeddingError> {
    let mut vectors = match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                parse_embedding_collection(embeddings)?
            } else if let Some(Value::Array(items)) = map.remove("data") {
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut obj) => obj
                            .remove("embedding")
                            .ok_or_else(|| {
                                EmbeddingError::Inference(
                                    "missing `embedding` field in data item".into(),
                                )
                            })
                            .and_then(parse_embedding_vector),
                        _ => Err(EmbeddingError::Inference(
                            "unexpected entry inside `data` array".into(),
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?
            } else {
                return Err(EmbeddingError::Inference(
                    "unsupported API response shape".into(),
                ));
            }
        }
        other => parse_embedding_collection(other)?,
    };

    if vectors.is_empty() {
        return Err(EmbeddingError::Inference(
            "API response did not contain embeddings".into(),
        ));
    }
    Ok(vectors.swap_remove(0))
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, EmbeddingError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| EmbeddingError::Inference("non-finite embedding value".into())),
                other => Err(EmbeddingError::Inference(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(EmbeddingError::Inference(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}
