use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Selects and tunes the embedding provider.
///
/// # Example
/// ```no_run
/// use embed::{build_provider, EmbedConfig};
///
/// let cfg = EmbedConfig {
///     mode: "api".into(),
///     api_url: Some("https://router.huggingface.co/hf-inference/models/openai/clip-vit-base-patch32".into()),
///     api_auth_header: Some("Bearer hf_xxx".into()),
///     ..Default::default()
/// };
///
/// let provider = build_provider(&cfg).unwrap();
/// assert_eq!(provider.model_id(), cfg.model_name);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbedConfig {
    /// `"stub"` (deterministic colour-layout vectors) or `"api"` (remote HTTP).
    pub mode: String,
    /// Model identifier the `api` provider reports in health checks. Must
    /// match the model that produced the catalog embeddings. The stub reports
    /// `stub-colour-grid-<grid>` instead.
    pub model_name: String,
    /// Feature-extraction endpoint when [`mode`](Self::mode) is `"api"`.
    pub api_url: Option<String>,
    /// Authorization header (e.g., `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    /// Overall API timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// Thumbnail side length for the stub; vectors have `grid * grid * 3` values.
    pub stub_grid: u32,
    /// Normalize vectors to unit length.
    pub normalize: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            mode: "stub".into(),
            model_name: "sentence-transformers/clip-ViT-B-32".into(),
            api_url: None,
            api_auth_header: None,
            api_timeout_secs: Some(30),
            stub_grid: 8,
            normalize: true,
        }
    }
}

impl EmbedConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs.unwrap_or(30))
    }

    /// Output dimensionality of the stub provider.
    pub fn stub_dimension(&self) -> usize {
        let grid = self.stub_grid as usize;
        grid * grid * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = EmbedConfig::default();
        assert_eq!(cfg.mode, "stub");
        assert_eq!(cfg.model_name, "sentence-transformers/clip-ViT-B-32");
        assert!(cfg.api_url.is_none());
        assert!(cfg.api_auth_header.is_none());
        assert_eq!(cfg.api_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.stub_grid, 8);
        assert_eq!(cfg.stub_dimension(), 192);
        assert!(cfg.normalize);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: EmbedConfig = serde_json::from_str(r#"{"mode":"api","api_url":"http://x"}"#).unwrap();
        assert_eq!(cfg.mode, "api");
        assert_eq!(cfg.api_url.as_deref(), Some("http://x"));
        assert_eq!(cfg.stub_grid, 8);
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = EmbedConfig {
            stub_grid: 2,
            api_timeout_secs: None,
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EmbedConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
