//! Cosine similarity and top-K ranking over the catalog.
//!
//! Ranking is a full linear scan: every entry with a usable embedding is
//! scored, the scores are sorted, and the first `k` are kept. The pass is a
//! pure function of the query vector and the catalog.

use catalog::{Catalog, CatalogEntry};

use crate::types::{RankStats, RankedResult, SkipReason};

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Returns `None` when the lengths differ, either slice is empty, or either
/// vector has zero norm. Accumulates in `f64` and clamps the result to
/// `[-1.0, 1.0]` to absorb rounding.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0f64;
    let mut norm_a = 0f64;
    let mut norm_b = 0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    score.is_finite().then(|| score.clamp(-1.0, 1.0) as f32)
}

/// Score one entry against the query, or say why it cannot be scored.
pub fn score_entry(query: &[f32], entry: &CatalogEntry) -> Result<f32, SkipReason> {
    let embedding = entry.embedding().ok_or(SkipReason::NoEmbedding)?;
    if embedding.len() != query.len() {
        return Err(SkipReason::DimensionMismatch {
            expected: query.len(),
            actual: embedding.len(),
        });
    }
    cosine_similarity(query, embedding).ok_or(SkipReason::ZeroNorm)
}

/// Top-`k` catalog entries by descending similarity to `query`.
///
/// Equal scores keep catalog order. Entries without an embedding, with a
/// different dimensionality, or with a zero-norm embedding are skipped; a
/// skipped entry never affects the others.
pub fn rank(query: &[f32], catalog: &Catalog, k: usize) -> Vec<RankedResult> {
    rank_with_stats(query, catalog, k).0
}

/// [`rank`] plus counters describing what was skipped.
pub fn rank_with_stats(query: &[f32], catalog: &Catalog, k: usize) -> (Vec<RankedResult>, RankStats) {
    let mut stats = RankStats::default();
    if k == 0 || query.is_empty() {
        return (Vec::new(), stats);
    }

    let entries = catalog.entries();
    let mut scored: Vec<(usize, f32)> = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match score_entry(query, entry) {
            Ok(score) => scored.push((idx, score)),
            Err(reason) => {
                if let SkipReason::DimensionMismatch { expected, actual } = reason {
                    tracing::warn!(
                        id = %entry.id,
                        expected,
                        actual,
                        "skipping catalog entry with mismatched embedding dimension"
                    );
                }
                stats.record_skip(reason);
            }
        }
    }
    stats.scored = scored.len();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(k);

    let results = scored
        .into_iter()
        .map(|(idx, score)| RankedResult::from_entry(&entries[idx], score))
        .collect();

    tracing::debug!(
        scored = stats.scored,
        skipped = stats.skipped(),
        k,
        "ranking pass complete"
    );
    (results, stats)
}
