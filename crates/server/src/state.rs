use crate::config::ServerConfig;
use acquire::ImageAcquirer;
use anyhow::Context;
use catalog::Catalog;
use matcher::Matcher;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state
///
/// One instance backs both servers. Everything inside is read-only after
/// construction, so handlers never take a lock.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Matcher instance (shared across requests and servers)
    pub matcher: Arc<Matcher>,
}

impl ServerState {
    pub fn new(config: ServerConfig, matcher: Matcher) -> Self {
        Self {
            config: Arc::new(config),
            matcher: Arc::new(matcher),
        }
    }

    /// Load the catalog, build the embedding provider and the image
    /// acquirer described by `config`.
    ///
    /// Fails when the catalog cannot be read or parsed; callers treat that as
    /// fatal and exit before binding any socket.
    pub fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        let catalog = Catalog::load(&config.catalog_path).with_context(|| {
            format!("failed to load catalog {}", config.catalog_path.display())
        })?;
        let embedder =
            embed::build_provider(&config.embed).context("failed to build embedding provider")?;
        let acquirer = ImageAcquirer::http(config.fetch_timeout())
            .context("failed to build image fetcher")?;

        Ok(Self::new(config, Matcher::new(catalog, embedder, acquirer)))
    }

    pub fn catalog(&self) -> &Catalog {
        self.matcher.catalog()
    }

    /// Path of a product image under the asset root, if the file exists.
    ///
    /// Only bare file names are accepted.
    pub async fn asset_path(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\'])
        {
            return None;
        }
        let path = self.config.asset_root.join(file_name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }

    /// Public URL of a product image served by the UI server.
    pub fn asset_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}",
            self.config.asset_url_prefix.trim_end_matches('/'),
            file_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embed::StubEmbedder;

    fn state(asset_root: &std::path::Path) -> ServerState {
        let config = ServerConfig {
            asset_root: asset_root.to_path_buf(),
            ..ServerConfig::default()
        };
        let acquirer = ImageAcquirer::http(config.fetch_timeout()).unwrap();
        let matcher = Matcher::new(
            Catalog::empty(),
            Arc::new(StubEmbedder::new(2).unwrap()),
            acquirer,
        );
        ServerState::new(config, matcher)
    }

    #[tokio::test]
    async fn asset_path_requires_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("product_1.jpg"), b"jpg").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let state = state(dir.path());

        assert_eq!(
            state.asset_path("product_1.jpg").await,
            Some(dir.path().join("product_1.jpg"))
        );
        assert_eq!(state.asset_path("product_2.jpg").await, None);
        assert_eq!(state.asset_path("nested").await, None);
    }

    #[tokio::test]
    async fn asset_path_rejects_anything_but_a_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/product_1.jpg"), b"jpg").unwrap();
        let state = state(dir.path());

        for name in ["", ".", "..", "nested/product_1.jpg", "../etc/passwd"] {
            assert_eq!(state.asset_path(name).await, None, "{name}");
        }
    }

    #[test]
    fn asset_url_joins_prefix() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(state(dir.path()).asset_url("product_9.jpg"), "/file/product_9.jpg");
    }
}
