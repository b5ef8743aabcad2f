use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::normalize::l2_normalize_in_place;
use crate::{EmbedConfig, EmbeddingError, EmbeddingProvider};

/// Deterministic colour-layout embedder for tests and offline runs.
///
/// The bitmap is shrunk to a `grid × grid` thumbnail and the RGB channels are
/// flattened row-major. Channel values are offset by one before scaling so a
/// pure black image still has a non-zero norm.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    grid: u32,
    normalize: bool,
    model_id: String,
}

impl StubEmbedder {
    pub fn new(grid: u32) -> Result<Self, EmbeddingError> {
        Self::from_config(&EmbedConfig {
            stub_grid: grid,
            ..Default::default()
        })
    }

    pub fn from_config(cfg: &EmbedConfig) -> Result<Self, EmbeddingError> {
        if cfg.stub_grid == 0 {
            return Err(EmbeddingError::InvalidConfig("stub_grid must be >= 1".into()));
        }
        Ok(Self {
            grid: cfg.stub_grid,
            normalize: cfg.normalize,
            model_id: format!("stub-colour-grid-{}", cfg.stub_grid),
        })
    }

    pub fn dimension(&self) -> usize {
        (self.grid * self.grid * 3) as usize
    }

    /// Synchronous core, shared by the trait impl and callers that precompute
    /// catalog vectors.
    pub fn embed_sync(&self, image: &RgbImage) -> Result<Vec<f32>, EmbeddingError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(EmbeddingError::Inference("image has no pixels".into()));
        }
        let thumb = imageops::resize(image, self.grid, self.grid, FilterType::Triangle);
        let mut v: Vec<f32> = thumb
            .as_raw()
            .iter()
            .map(|&c| (f32::from(c) + 1.0) / 256.0)
            .collect();
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        Ok(v)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, image: &RgbImage) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_sync(image)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
