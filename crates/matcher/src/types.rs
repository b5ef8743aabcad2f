use acquire::AcquireError;
use catalog::{CatalogEntry, Price};
use embed::EmbeddingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default result count for the programmatic API.
pub const API_TOP_K: usize = 20;

/// Default result count for the interactive UI.
pub const UI_TOP_K: usize = 6;

/// One ranked catalog product. Carries every display field plus the score,
/// never the embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedResult {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub category: String,
    pub description: String,
    #[serde(rename = "image")]
    pub image_ref: String,
    /// Cosine similarity in [-1.0, 1.0].
    pub similarity: f32,
}

impl RankedResult {
    pub fn from_entry(entry: &CatalogEntry, similarity: f32) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            price: entry.price.clone(),
            category: entry.category.clone(),
            description: entry.description.clone(),
            image_ref: entry.image_ref.clone(),
            similarity,
        }
    }

    /// File name component of [`image_ref`](Self::image_ref).
    pub fn image_file_name(&self) -> &str {
        self.image_ref
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.image_ref)
    }
}

/// Why a catalog entry was left out of a ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry has no embedding.
    NoEmbedding,
    /// The entry's embedding length differs from the query's.
    DimensionMismatch { expected: usize, actual: usize },
    /// The entry's embedding has zero norm; cosine similarity is undefined.
    ZeroNorm,
}

/// Per-pass counters, useful for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankStats {
    pub scored: usize,
    pub no_embedding: usize,
    pub dimension_mismatch: usize,
    pub zero_norm: usize,
}

impl RankStats {
    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoEmbedding => self.no_embedding += 1,
            SkipReason::DimensionMismatch { .. } => self.dimension_mismatch += 1,
            SkipReason::ZeroNorm => self.zero_norm += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.no_embedding + self.dimension_mismatch + self.zero_norm
    }
}

/// Errors surfaced by the match pipeline. Each is a caller-input problem from
/// the servers' point of view.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    /// Neither inline data nor a URL was supplied.
    #[error("No image provided")]
    MissingImage,
    /// Inline data or fetched bytes are not a decodable image.
    #[error("{0}")]
    Decode(AcquireError),
    /// The remote image could not be fetched.
    #[error("{0}")]
    Fetch(AcquireError),
    /// The embedding provider failed or returned malformed output.
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    /// The query embedding has zero norm, so no similarity is defined.
    #[error("Query embedding has zero norm")]
    EmptyQuery,
}

impl From<AcquireError> for MatchError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Decode(_) => MatchError::Decode(err),
            AcquireError::Fetch { .. } | AcquireError::Client(_) => MatchError::Fetch(err),
        }
    }
}
