use std::sync::Arc;
use std::time::Instant;

use acquire::{ImageAcquirer, ImageRef, RgbImage};
use catalog::Catalog;
use embed::EmbeddingProvider;

use crate::rank::rank;
use crate::types::{MatchError, RankedResult};


/// Runs the acquire → embed → rank pipeline against a shared catalog.
///
/// A `Matcher` holds only shared, read-only handles, so one instance can be
/// wrapped in an `Arc` and used by both request servers at once.
#[derive(Clone)]
pub struct Matcher {
    catalog: Catalog,
    embedder: Arc<dyn EmbeddingProvider>,
    acquirer: ImageAcquirer,
}

impl Matcher {
    pub fn new(
        catalog: Catalog,
        embedder: Arc<dyn EmbeddingProvider>,
        acquirer: ImageAcquirer,
    ) -> Self {
        Self {
            catalog,
            embedder,
            acquirer,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Identifier of the embedding model answering queries.
    pub fn model_id(&self) -> &str {
        self.embedder.model_id()
    }

    /// Resolve `image`, embed it, and return the `k` most similar products.
    pub async fn match_image(
        &self,
        image: &ImageRef,
        k: usize,
    ) -> Result<Vec<RankedResult>, MatchError> {
        let start = Instant::now();
        let bitmap = self.acquirer.acquire(image).await?;
        tracing::debug!(
            source = image.kind(),
            width = bitmap.width(),
            height = bitmap.height(),
            "query image acquired"
        );
        let results = self.match_bitmap(&bitmap, k).await?;
        tracing::info!(
            source = image.kind(),
            k,
            hits = results.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "match complete"
        );
        Ok(results)
    }

    /// Embed an already-decoded bitmap and rank the catalog against it.
    pub async fn match_bitmap(
        &self,
        bitmap: &RgbImage,
        k: usize,
    ) -> Result<Vec<RankedResult>, MatchError> {
        let query = self.embedder.embed(bitmap).await?;
        if query.iter().all(|x| *x == 0.0) {
            return Err(MatchError::EmptyQuery);
        }
        if let Some(dim) = self.catalog.dimension() {
            if dim != query.len() {
                tracing::warn!(
                    query_dim = query.len(),
                    catalog_dim = dim,
                    model = self.model_id(),
                    "query dimension differs from catalog; check the embedding model"
                );
            }
        }
        Ok(rank(&query, &self.catalog, k))
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("products", &self.catalog.len())
            .field("model", &self.model_id())
            .finish_non_exhaustive()
    }
}
