//! Image embedding providers
//!
//! The embedding model is an external collaborator: one RGB bitmap in, one
//! fixed-length vector out. This crate defines that seam as the
//! [`EmbeddingProvider`] trait and ships two implementations:
//!
//! - **Stub mode** - deterministic colour-layout vectors. No model files, no
//!   network. Good for tests and local runs against a stub-built catalog.
//! - **API mode** - POST the image to a remote feature-extraction endpoint
//!   (e.g. a hosted CLIP model) and read back the vector.
//!
//! The catalog embeddings and the query embeddings must come from the same
//! model, or similarity scores mean nothing. Nothing checks that at runtime;
//! [`EmbeddingProvider::model_id`] is surfaced in the health endpoint so
//! operators can.
//!
//! ## Quick example
//!
//! ```no_run
//! use embed::{build_provider, EmbedConfig};
//! use image::RgbImage;
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = build_provider(&EmbedConfig::default()).unwrap();
//!     let vector = provider.embed(&RgbImage::new(32, 32)).await.unwrap();
//!     println!("{} dims from {}", vector.len(), provider.model_id());
//! }
//! ```

pub mod config;
pub mod error;

mod api;
mod normalize;
mod stub;

pub use crate::api::ApiEmbedder;
pub use crate::config::EmbedConfig;
pub use crate::error::EmbeddingError;
pub use crate::normalize::l2_normalize_in_place;
pub use crate::stub::StubEmbedder;

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;

/// Maps a normalized bitmap to a fixed-length embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, image: &RgbImage) -> Result<Vec<f32>, EmbeddingError>;

    /// Identifier of the model behind this provider.
    fn model_id(&self) -> &str;
}

/// Construct the provider selected by `cfg.mode`.
pub fn build_provider(cfg: &EmbedConfig) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    let provider: Arc<dyn EmbeddingProvider> = match cfg.mode.as_str() {
        "stub" | "fast" => Arc::new(StubEmbedder::from_config(cfg)?),
        "api" => Arc::new(ApiEmbedder::from_config(cfg)?),
        other => {
            return Err(EmbeddingError::InvalidConfig(format!(
                "unknown embedding mode '{other}' (expected 'stub' or 'api')"
            )))
        }
    };
    tracing::info!(mode = %cfg.mode, model = provider.model_id(), "embedding provider ready");
    Ok(provider)
}
