//! Workspace umbrella crate for the visual product matcher.
//!
//! This crate stitches the catalog store, image acquisition, embedding and
//! ranking stages together so callers can build a ready-to-query [`Matcher`]
//! with a single call, or use each stage directly through the re-exports.
//!
//! ```no_run
//! use prodmatch::{build_matcher, EmbedConfig, ImageRef, API_TOP_K, DEFAULT_FETCH_TIMEOUT};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let matcher = build_matcher(
//!     "server/products.json",
//!     &EmbedConfig::default(),
//!     DEFAULT_FETCH_TIMEOUT,
//! )?;
//! let hits = matcher
//!     .match_image(&ImageRef::Remote("https://example.com/mug.jpg".into()), API_TOP_K)
//!     .await?;
//! println!("{} matches", hits.len());
//! # Ok(())
//! # }
//! ```

pub use acquire::{
    decode_bytes, decode_inline, is_data_uri, AcquireError, Bytes, Fetcher, HttpFetcher,
    ImageAcquirer, ImageRef, RgbImage, DEFAULT_FETCH_TIMEOUT,
};
pub use catalog::{Catalog, CatalogEntry, CatalogError, Price};
pub use embed::{
    build_provider, ApiEmbedder, EmbedConfig, EmbeddingError, EmbeddingProvider, StubEmbedder,
};
pub use matcher::{
    cosine_similarity, rank, rank_with_stats, MatchError, Matcher, RankStats, RankedResult,
    SkipReason, API_TOP_K, UI_TOP_K,
};

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while assembling the matching pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("catalog failure: {0}")]
    Catalog(#[from] CatalogError),
    #[error("embedding provider failure: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("image acquirer failure: {0}")]
    Acquire(#[from] AcquireError),
}

/// Load the catalog at `catalog_path` and wire it to the provider selected
/// by `embed_cfg` and an HTTP acquirer with the given fetch timeout.
pub fn build_matcher(
    catalog_path: impl AsRef<Path>,
    embed_cfg: &EmbedConfig,
    fetch_timeout: Duration,
) -> Result<Matcher, PipelineError> {
    let catalog = Catalog::load(catalog_path)?;
    let embedder = build_provider(embed_cfg)?;
    let acquirer = ImageAcquirer::http(fetch_timeout)?;

    tracing::info!(
        products = catalog.len(),
        embedded = catalog.embedded_count(),
        model = embedder.model_id(),
        "matcher assembled"
    );
    Ok(Matcher::new(catalog, embedder, acquirer))
}

/// Embed `image` with `provider` and rank `catalog` against it, without the
/// acquisition step.
///
/// A zero-norm query is [`MatchError::EmptyQuery`], as with
/// [`Matcher::match_bitmap`].
pub async fn match_bitmap(
    catalog: &Catalog,
    provider: &dyn EmbeddingProvider,
    image: &RgbImage,
    k: usize,
) -> Result<Vec<RankedResult>, MatchError> {
    let query = provider.embed(image).await?;
    if query.iter().all(|x| *x == 0.0) {
        return Err(MatchError::EmptyQuery);
    }
    Ok(rank(&query, catalog, k))
}
