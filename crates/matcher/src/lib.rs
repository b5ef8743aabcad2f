//! # Product Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` is the algorithmic core of the product matcher. It turns a query
//! image into a ranked list of catalog products:
//!
//! 1. [`acquire`] resolves the caller's image reference into an RGB bitmap;
//! 2. an [`embed::EmbeddingProvider`] maps the bitmap to a query vector;
//! 3. [`rank`] scores every catalog entry by cosine similarity and keeps
//!    the top `k`.
//!
//! ## Core Types
//!
//! - [`Matcher`]: the pipeline. Holds the shared [`catalog::Catalog`], the
//!   embedding provider and the image acquirer; cheap to clone and safe to
//!   share between servers.
//! - [`RankedResult`]: display fields of a product plus its similarity.
//! - [`MatchError`]: everything that can go wrong for one request.
//! - [`SkipReason`] / [`RankStats`]: why entries were left out of a pass.
//!
//! ## Ranking rules
//!
//! - Entries without an embedding are ignored.
//! - Entries whose embedding length differs from the query are skipped with
//!   a warning; the rest of the pass continues.
//! - Zero-norm embeddings are skipped (similarity undefined).
//! - Ties keep catalog order, so identical inputs give identical output.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use acquire::{ImageAcquirer, ImageRef, DEFAULT_FETCH_TIMEOUT};
//! use catalog::Catalog;
//! use embed::{build_provider, EmbedConfig};
//! use matcher::{Matcher, API_TOP_K};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load("server/products.json")?;
//! let embedder = build_provider(&EmbedConfig::default())?;
//! let acquirer = ImageAcquirer::http(DEFAULT_FETCH_TIMEOUT)?;
//! let matcher = Arc::new(Matcher::new(catalog, embedder, acquirer));
//!
//! let hits = matcher
//!     .match_image(&ImageRef::Remote("https://example.com/shoe.jpg".into()), API_TOP_K)
//!     .await?;
//! for hit in hits {
//!     println!("{} {:.3}", hit.name, hit.similarity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod rank;
pub mod types;

pub use crate::engine::Matcher;
pub use crate::rank::{cosine_similarity, rank, rank_with_stats, score_entry};
pub use crate::types::{
    MatchError, RankStats, RankedResult, SkipReason, API_TOP_K, UI_TOP_K,
};
