//! Product catalog store
//!
//! Loads the product snapshot once and keeps it in memory for the life of the
//! process. A [`Catalog`] has no mutating API: clones share one
//! `Arc<[CatalogEntry]>`, so any number of request handlers can read it
//! concurrently without locks.
//!
//! ## Snapshot format
//!
//! A JSON array of records. `id`, `name` and `price` are required; `category`,
//! `description`, `image` and `embedding` are optional. Unknown fields are
//! ignored.
//!
//! ```json
//! [
//!   {"id": "1", "name": "Canvas Sneaker", "price": 59.0,
//!    "category": "Footwear", "image": "product_1.jpg",
//!    "embedding": [0.013, -0.221, 0.087]}
//! ]
//! ```
//!
//! ## Quick example
//!
//! ```no_run
//! use catalog::Catalog;
//!
//! let catalog = Catalog::load("server/products.json").unwrap();
//! println!("{} products, {} with embeddings", catalog.len(), catalog.embedded_count());
//! ```

pub mod error;
pub mod types;

pub use crate::error::CatalogError;
pub use crate::types::{CatalogEntry, Price};

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

/// Immutable, cheaply clonable product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Arc<[CatalogEntry]>,
}

impl Catalog {
    /// Read a JSON snapshot from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            products = catalog.len(),
            embedded = catalog.embedded_count(),
            dimension = ?catalog.dimension(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a snapshot from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_reader(reader)?;
        Self::from_entries(entries)
    }

    /// Parse a snapshot held in memory.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Build a catalog from already-constructed entries, preserving their order.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }

        let catalog = Self {
            entries: entries.into(),
        };
        catalog.warn_on_mixed_dimensions();
        Ok(catalog)
    }

    /// A catalog with no products.
    pub fn empty() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }

    /// All entries in snapshot order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by identifier.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of entries that carry an embedding.
    pub fn embedded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.embedding.is_some())
            .count()
    }

    /// Dimensionality of the first embedding-bearing entry.
    pub fn dimension(&self) -> Option<usize> {
        self.entries
            .iter()
            .find_map(|e| e.embedding().map(<[f32]>::len))
    }

    fn warn_on_mixed_dimensions(&self) {
        let Some(expected) = self.dimension() else {
            return;
        };
        for entry in self.entries.iter() {
            if let Some(vector) = entry.embedding() {
                if vector.len() != expected {
                    tracing::warn!(
                        id = %entry.id,
                        expected,
                        actual = vector.len(),
                        "catalog entry has mismatched embedding dimension"
                    );
                }
            }
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}
