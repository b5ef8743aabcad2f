//! Image acquisition
//!
//! Turns a caller-supplied image reference into a decoded, colour-normalized
//! bitmap. Two kinds of reference exist:
//!
//! - **Inline** data: base64 bytes, optionally wrapped in a `data:` URI.
//! - **Remote** URL: fetched over HTTP with a bounded timeout (15 s by
//!   default). A "URL" that is really a `data:` URI is decoded in place and
//!   never touches the network.
//!
//! Every successful path returns an 8-bit RGB [`RgbImage`]: no alpha, no
//! palette, no grayscale.
//!
//! Decoding runs on the blocking pool so a large upload does not stall the
//! async workers.
//!
//! ```no_run
//! use acquire::{ImageAcquirer, ImageRef, DEFAULT_FETCH_TIMEOUT};
//!
//! # async fn run() -> Result<(), acquire::AcquireError> {
//! let acquirer = ImageAcquirer::http(DEFAULT_FETCH_TIMEOUT)?;
//! let bitmap = acquirer
//!     .acquire(&ImageRef::Remote("https://example.com/shoe.jpg".into()))
//!     .await?;
//! println!("{}x{}", bitmap.width(), bitmap.height());
//! # Ok(())
//! # }
//! ```

pub mod error;

mod decode;
mod fetch;

pub use crate::decode::{decode_bytes, decode_inline, is_data_uri, DATA_URI_SCHEME};
pub use crate::error::AcquireError;
pub use crate::fetch::{Fetcher, HttpFetcher, BROWSER_USER_AGENT, DEFAULT_FETCH_TIMEOUT};
pub use bytes::Bytes;
pub use image::RgbImage;

use std::sync::Arc;
use std::time::Duration;

/// A validated reference to the query image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Base64-encoded bytes, optionally as a `data:` URI.
    Inline(String),
    /// URL to fetch. `data:` URIs are accepted here too and decoded inline.
    Remote(String),
}

impl ImageRef {
    /// Short label for logs; never includes the payload.
    pub fn kind(&self) -> &'static str {
        match self {
            ImageRef::Inline(_) => "inline",
            ImageRef::Remote(url) if is_data_uri(url) => "data-url",
            ImageRef::Remote(_) => "remote",
        }
    }
}

/// Resolves [`ImageRef`]s into RGB bitmaps.
#[derive(Clone)]
pub struct ImageAcquirer {
    fetcher: Arc<dyn Fetcher>,
}

impl ImageAcquirer {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Acquirer that fetches remote images with [`HttpFetcher`].
    pub fn http(timeout: Duration) -> Result<Self, AcquireError> {
        Ok(Self::new(Arc::new(HttpFetcher::new(timeout)?)))
    }

    pub async fn acquire(&self, image: &ImageRef) -> Result<RgbImage, AcquireError> {
        match image {
            ImageRef::Inline(data) => decode_inline_blocking(data.clone()).await,
            ImageRef::Remote(url) if is_data_uri(url) => {
                tracing::debug!("remote reference is a data URI; decoding inline");
                decode_inline_blocking(url.clone()).await
            }
            ImageRef::Remote(url) => {
                let bytes = self.fetcher.fetch(url).await?;
                tracing::debug!(url = %url, bytes = bytes.len(), "remote image fetched");
                run_blocking(move || decode_bytes(&bytes)).await
            }
        }
    }
}

impl std::fmt::Debug for ImageAcquirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAcquirer").finish_non_exhaustive()
    }
}

async fn decode_inline_blocking(data: String) -> Result<RgbImage, AcquireError> {
    run_blocking(move || decode_inline(&data)).await
}

async fn run_blocking<F>(job: F) -> Result<RgbImage, AcquireError>
where
    F: FnOnce() -> Result<RgbImage, AcquireError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AcquireError::Decode(format!("decoder task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::tests::rgba_png;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Records every URL it is asked for and serves a fixed response.
    struct RecordingFetcher {
        calls: Mutex<Vec<String>>,
        response: Result<Vec<u8>, AcquireError>,
    }

    impl RecordingFetcher {
        fn serving(bytes: Vec<u8>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: Ok(bytes),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: Err(AcquireError::fetch("http://mock", reason)),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, AcquireError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.response.clone().map(Bytes::from)
        }
    }

    #[tokio::test]
    async fn inline_reference_never_fetches() {
        let fetcher = Arc::new(RecordingFetcher::serving(Vec::new()));
        let acquirer = ImageAcquirer::new(fetcher.clone());
        let data = STANDARD.encode(rgba_png(4, 4));
        let img = acquirer.acquire(&ImageRef::Inline(data)).await.unwrap();
        assert_eq!(img.dimensions(), (4, 4));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn data_url_short_circuits_network() {
        let fetcher = Arc::new(RecordingFetcher::serving(Vec::new()));
        let acquirer = ImageAcquirer::new(fetcher.clone());
        let url = format!("data:image/png;base64,{}", STANDARD.encode(rgba_png(1, 1)));
        let img = acquirer.acquire(&ImageRef::Remote(url)).await.unwrap();
        assert_eq!(img.dimensions(), (1, 1));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn remote_url_is_fetched_and_decoded() {
        let fetcher = Arc::new(RecordingFetcher::serving(rgba_png(5, 3)));
        let acquirer = ImageAcquirer::new(fetcher.clone());
        let img = acquirer
            .acquire(&ImageRef::Remote("https://cdn.example.com/a.png".into()))
            .await
            .unwrap();
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(fetcher.calls(), ["https://cdn.example.com/a.png"]);
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let acquirer = ImageAcquirer::new(Arc::new(RecordingFetcher::failing("refused")));
        let err = acquirer
            .acquire(&ImageRef::Remote("https://cdn.example.com/a.png".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AcquireError::Fetch { .. }));
    }

    #[tokio::test]
    async fn fetched_garbage_is_decode_error() {
        let acquirer = ImageAcquirer::new(Arc::new(RecordingFetcher::serving(b"<html>".to_vec())));
        let err = acquirer
            .acquire(&ImageRef::Remote("https://cdn.example.com/a.png".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AcquireError::Decode(_)));
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ImageRef::Inline("AAAA".into()).kind(), "inline");
        assert_eq!(ImageRef::Remote("data:image/png;base64,AA".into()).kind(), "data-url");
        assert_eq!(ImageRef::Remote("https://x".into()).kind(), "remote");
    }
}
