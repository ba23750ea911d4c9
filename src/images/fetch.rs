//! Blob byte fetching.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{BinderConfig, ImageRef};

use super::{DataUrl, ImageError};

/// Request timeout used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the raw bytes behind an `ImageRef`.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    async fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>, ImageError>;
}

#[async_trait]
impl<F: BlobFetcher + ?Sized> BlobFetcher for Arc<F> {
    async fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>, ImageError> {
        (**self).fetch(image).await
    }
}

/// Fetches blobs from their direct URLs over HTTP(S).
///
/// Inline `data:` references are decoded locally without a request. Every
/// request is bounded by the fetcher's timeout.
#[derive(Clone, Debug)]
pub struct HttpBlobFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for HttpBlobFetcher {
    fn default() -> Self {
        Self::with_client(reqwest::Client::new())
    }
}

impl HttpBlobFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher whose requests time out after the configured request timeout.
    #[must_use]
    pub fn from_config(config: &BinderConfig) -> Self {
        Self::new().with_timeout(config.request_timeout())
    }

    /// Use a preconfigured client (proxies, headers).
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl BlobFetcher for HttpBlobFetcher {
    async fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>, ImageError> {
        let url = image.direct_url();
        if image.is_inline() {
            return DataUrl::parse(url)?.decode();
        }

        let fetch_err = |e: reqwest::Error| ImageError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(fetch_err)?;
        debug!(url, len = bytes.len(), "fetched blob");
        Ok(bytes.to_vec())
    }
}

/// In-process blob store keyed by direct URL.
///
/// Blobs can be replaced while in use, and every fetch is counted.
#[derive(Debug, Default)]
pub struct MemoryBlobFetcher {
    blobs: RwLock<FxHashMap<String, Vec<u8>>>,
    fetches: AtomicUsize,
}

impl MemoryBlobFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the bytes behind `url`. Returns a reference to them.
    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) -> ImageRef {
        let url = url.into();
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.insert(url.clone(), bytes);
        }
        ImageRef::from_url(url)
    }

    /// Number of fetches served so far, including failed ones.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BlobFetcher for MemoryBlobFetcher {
    async fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>, ImageError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let url = image.direct_url();
        let blobs = self.blobs.read().map_err(|_| ImageError::Fetch {
            url: url.to_string(),
            reason: "blob store lock poisoned".to_string(),
        })?;
        blobs.get(url).cloned().ok_or_else(|| ImageError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
