use embed::EmbedConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address shared by both servers
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Programmatic API port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Interactive UI port
    #[serde(default = "default_ui_port")]
    pub ui_port: u16,

    /// Catalog snapshot (JSON array of products)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Directory holding product images for the UI gallery
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,

    /// URL prefix under which the UI server exposes `asset_root`
    #[serde(default = "default_asset_url_prefix")]
    pub asset_url_prefix: String,

    /// Remote image fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Results returned by `POST /api/match`
    #[serde(default = "default_api_top_k")]
    pub api_top_k: usize,

    /// Results rendered by the interactive UI
    #[serde(default = "default_ui_top_k")]
    pub ui_top_k: usize,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Embedding provider settings
    #[serde(default)]
    pub embed: EmbedConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api_port: default_api_port(),
            ui_port: default_ui_port(),
            catalog_path: default_catalog_path(),
            asset_root: default_asset_root(),
            asset_url_prefix: default_asset_url_prefix(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            api_top_k: default_api_top_k(),
            ui_top_k: default_ui_top_k(),
            log_level: default_log_level(),
            embed: EmbedConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("prodmatch").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("PRODMATCH").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the servers cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_port == self.ui_port {
            anyhow::bail!(
                "api_port and ui_port must differ (both are {})",
                self.api_port
            );
        }
        if self.api_top_k == 0 || self.ui_top_k == 0 {
            anyhow::bail!("api_top_k and ui_top_k must be at least 1");
        }
        let prefix = &self.asset_url_prefix;
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            anyhow::bail!("asset_url_prefix must look like '/file', got '{prefix}'");
        }
        Ok(())
    }

    /// Socket address of the API server
    pub fn api_addr(&self) -> anyhow::Result<SocketAddr> {
        socket_addr(&self.bind_addr, self.api_port)
    }

    /// Socket address of the UI server
    pub fn ui_addr(&self) -> anyhow::Result<SocketAddr> {
        socket_addr(&self.bind_addr, self.ui_port)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn socket_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let addr_str = format!("{host}:{port}");
    Ok(addr_str.parse()?)
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_ui_port() -> u16 {
    7860
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("server/products.json")
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("server/assets/product")
}

fn default_asset_url_prefix() -> String {
    "/file".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_api_top_k() -> usize {
    matcher::API_TOP_K
}

fn default_ui_top_k() -> usize {
    matcher::UI_TOP_K
}

fn default_log_level() -> String {
    "info".to_string()
}
