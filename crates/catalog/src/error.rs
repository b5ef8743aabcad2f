use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while loading a catalog snapshot.
///
/// Every variant is fatal at startup: the servers never bind without a
/// loaded catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The snapshot file could not be opened or read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The snapshot is not valid JSON, or an entry lacks `id`, `name` or `price`.
    #[error("malformed catalog snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two entries share the same identifier.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
}
