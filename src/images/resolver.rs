//! Card image resolution.
//!
//! ## Precedence
//!
//! An edited image cached for the card always wins, with no freshness check
//! against the stored blob. Only when there is none is the blob fetched.
//! Failures propagate to the caller; nothing is retried here.

use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::core::{Card, CardId, ImageRef};
use crate::store::{EditedImageCache, KeyValueStore};

use super::{downscale_for_export, BlobFetcher, DataUrl, ImageError, Quality};

/// Default longest edge of standard-quality images.
pub const STANDARD_MAX_EDGE: u32 = 1200;

/// Resolves card images to inline data URLs.
#[derive(Debug)]
pub struct ImageResolver<F, S> {
    fetcher: F,
    cache: EditedImageCache<S>,
    standard_max_edge: u32,
}

impl<F: BlobFetcher, S: KeyValueStore> ImageResolver<F, S> {
    pub fn new(fetcher: F, cache: EditedImageCache<S>) -> Self {
        Self {
            fetcher,
            cache,
            standard_max_edge: STANDARD_MAX_EDGE,
        }
    }

    /// Set the longest edge kept by `Quality::Standard`.
    #[must_use]
    pub fn with_standard_max_edge(mut self, edge: u32) -> Self {
        self.standard_max_edge = edge;
        self
    }

    /// The edited-image cache consulted before fetching.
    #[must_use]
    pub fn cache(&self) -> &EditedImageCache<S> {
        &self.cache
    }

    /// The blob fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve a card's image at full quality.
    pub async fn resolve(&self, card: &CardId, image: &ImageRef) -> Result<DataUrl, ImageError> {
        self.resolve_with_quality(card, image, Quality::High).await
    }

    /// Resolve a card's image for export at the given quality.
    ///
    /// Edited images are returned as cached regardless of quality.
    #[instrument(level = "debug", skip(self, card, image), fields(card = %card))]
    pub async fn resolve_with_quality(
        &self,
        card: &CardId,
        image: &ImageRef,
        quality: Quality,
    ) -> Result<DataUrl, ImageError> {
        if let Some(edited) = self.cache.get(card) {
            debug!("using edited image");
            return Ok(edited);
        }

        let bytes = self.fetcher.fetch(image).await?;
        let bytes = match quality {
            Quality::High => bytes,
            Quality::Standard => downscale_for_export(bytes, self.standard_max_edge)?,
        };
        Ok(DataUrl::encode(&bytes))
    }

    /// Resolve the images of several cards concurrently, in order.
    ///
    /// Fails with the first error encountered.
    pub async fn resolve_all(&self, cards: &[Card], quality: Quality) -> Result<Vec<DataUrl>, ImageError> {
        try_join_all(
            cards
                .iter()
                .map(|card| self.resolve_with_quality(&card.id, &card.image, quality)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::images::MemoryBlobFetcher;
    use crate::store::MemoryStore;

    fn resolver() -> ImageResolver<Arc<MemoryBlobFetcher>, MemoryStore> {
        ImageResolver::new(
            Arc::new(MemoryBlobFetcher::new()),
            EditedImageCache::new(MemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn test_fetches_when_not_edited() {
        let resolver = resolver();
        let image = resolver.fetcher().insert("mem://c1", b"hello".to_vec());

        let url = resolver.resolve(&CardId::new("c1"), &image).await.unwrap();
        assert_eq!(url.as_str(), "data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(resolver.fetcher().fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_edited_image_skips_fetch() {
        let resolver = resolver();
        let card = CardId::new("c1");
        let edited = DataUrl::from_parts("image/png", b"edited");
        resolver.cache().save(&card, &edited).unwrap();

        let url = resolver
            .resolve(&card, &ImageRef::from_url("mem://missing"))
            .await
            .unwrap();
        assert_eq!(url, edited);
        assert_eq!(resolver.fetcher().fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_blob_propagates() {
        let resolver = resolver();
        let result = resolver
            .resolve(&CardId::new("c1"), &ImageRef::from_url("mem://missing"))
            .await;
        assert!(matches!(result, Err(ImageError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order() {
        let resolver = resolver();
        let a = Card::new("a", "A", resolver.fetcher().insert("mem://a", b"aaa".to_vec()));
        let b = Card::new("b", "B", resolver.fetcher().insert("mem://b", b"bbb".to_vec()));

        let urls = resolver.resolve_all(&[a, b], Quality::High).await.unwrap();
        assert_eq!(urls[0].decode().unwrap(), b"aaa");
        assert_eq!(urls[1].decode().unwrap(), b"bbb");
    }
}
