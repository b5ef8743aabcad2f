use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::AcquireError;

/// Browser-like identification; some image hosts reject unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Default bound on a remote image fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of remote image bytes.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, AcquireError>;
}

/// [`Fetcher`] backed by a pooled `reqwest` client with an overall timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AcquireError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| AcquireError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn describe(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else if let Some(status) = err.status() {
            format!("server answered {status}")
        } else {
            err.to_string()
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, AcquireError> {
        tracing::debug!(url, "fetching remote image");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AcquireError::fetch(url, self.describe(&e)))?;
        response
            .bytes()
            .await
            .map_err(|e| AcquireError::fetch(url, self.describe(&e)))
    }
}
