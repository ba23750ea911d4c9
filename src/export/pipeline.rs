//! The export pipeline: resolve, render, print.

use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::core::{Binder, BinderConfig, Card};
use crate::images::{BlobFetcher, ImageResolver};
use crate::pagination::{paginate, Page};
use crate::store::KeyValueStore;

use super::{generate_filename, ExportError, ExportOptions, PageDocument, PrintHost, ResolvedCard, PAGE_SLOTS};

/// What a finished export produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    /// Suggested file name, `<slug>-page-<n>.pdf`.
    pub filename: String,
    /// Cards rendered on the page.
    pub cards: usize,
    /// Cards left off because the page was full.
    pub dropped: usize,
}

/// Exports binder pages through a [`PrintHost`].
///
/// ## Usage
///
/// ```no_run
/// use std::sync::Arc;
/// use photocard_binder::core::Binder;
/// use photocard_binder::export::{ExportOptions, FilePrintHost, PageExporter};
/// use photocard_binder::images::{HttpBlobFetcher, ImageResolver};
/// use photocard_binder::store::{EditedImageCache, MemoryStore};
///
/// # async fn run(binder: Binder) -> Result<(), photocard_binder::export::ExportError> {
/// let resolver = ImageResolver::new(
///     HttpBlobFetcher::new(),
///     EditedImageCache::new(Arc::new(MemoryStore::new())),
/// );
/// let exporter = PageExporter::new(resolver, FilePrintHost::new("exports"));
///
/// let receipt = exporter.export_page(&binder.name, 1, &binder.cards, "#FFF8F0", ExportOptions::default()).await?;
/// println!("wrote {}", receipt.filename);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PageExporter<F, S, H> {
    resolver: ImageResolver<F, S>,
    host: H,
    slots: usize,
}

impl<F: BlobFetcher, S: KeyValueStore, H: PrintHost> PageExporter<F, S, H> {
    pub fn new(resolver: ImageResolver<F, S>, host: H) -> Self {
        Self {
            resolver,
            host,
            slots: PAGE_SLOTS,
        }
    }

    /// Create an exporter using the configured slot count and image size.
    pub fn from_config(resolver: ImageResolver<F, S>, host: H, config: &BinderConfig) -> Self {
        Self {
            resolver: resolver.with_standard_max_edge(config.standard_max_edge),
            host,
            slots: config.export_slots.max(1),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &ImageResolver<F, S> {
        &self.resolver
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Export one page of cards. `page_number` is 1-based.
    ///
    /// Cards past the slot count are neither fetched nor rendered. Image
    /// failures abort before any surface is opened.
    #[instrument(skip(self, cards, background), fields(cards = cards.len()))]
    pub async fn export_page(
        &self,
        binder_name: &str,
        page_number: usize,
        cards: &[Card],
        background: &str,
        options: ExportOptions,
    ) -> Result<ExportReceipt, ExportError> {
        let shown = &cards[..cards.len().min(self.slots)];
        let images = self.resolver.resolve_all(shown, options.quality).await?;
        debug!(images = images.len(), "images resolved");

        let document = PageDocument::new(binder_name, page_number, options.page_size)
            .with_background(background)
            .with_slots(self.slots)
            .with_cards(
                shown
                    .iter()
                    .zip(images)
                    .map(|(card, image)| ResolvedCard::new(card, image)),
            );
        let html = document.render()?;

        let filename = generate_filename(binder_name, page_number);
        let mut surface = self.host.open_surface(&filename)?;
        let printed = surface.write(&html).and_then(|()| surface.print());
        let closed = surface.close();
        printed?;
        closed?;

        info!(%filename, "page exported");
        Ok(ExportReceipt {
            filename,
            cards: shown.len(),
            dropped: cards.len() - shown.len(),
        })
    }

    /// Export the page of a binder currently shown by a pager.
    pub async fn export_binder_page(
        &self,
        binder: &Binder,
        page: &Page<'_, Card>,
        options: ExportOptions,
    ) -> Result<ExportReceipt, ExportError> {
        self.export_page(
            &binder.name,
            page.number(),
            page.items,
            &binder.theme.page_background,
            options,
        )
        .await
    }

    /// Export every page of a binder, one after another.
    ///
    /// Stops at the first failing page.
    pub async fn export_binder(
        &self,
        binder: &Binder,
        cards_per_page: NonZeroUsize,
        options: ExportOptions,
    ) -> Result<Vec<ExportReceipt>, ExportError> {
        let mut receipts = Vec::new();
        for (index, cards) in paginate(&binder.cards, cards_per_page).enumerate() {
            let receipt = self
                .export_page(&binder.name, index + 1, cards, &binder.theme.page_background, options)
                .await?;
            receipts.push(receipt);
        }
        Ok(receipts)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::ImageRef;
    use crate::export::FilePrintHost;
    use crate::images::{ImageError, MemoryBlobFetcher, Quality};
    use crate::store::{EditedImageCache, MemoryStore};

    fn exporter(dir: &std::path::Path) -> PageExporter<Arc<MemoryBlobFetcher>, MemoryStore, FilePrintHost> {
        let resolver = ImageResolver::new(
            Arc::new(MemoryBlobFetcher::new()),
            EditedImageCache::new(MemoryStore::new()),
        );
        PageExporter::new(resolver, FilePrintHost::new(dir))
    }

    fn cards(exporter: &PageExporter<Arc<MemoryBlobFetcher>, MemoryStore, FilePrintHost>, n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| {
                let image = exporter.resolver().fetcher().insert(format!("mem://c{i}"), vec![i as u8]);
                Card::new(format!("c{i}"), format!("Card {i}"), image)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_export_page_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        let cards = cards(&exporter, 3);
        let options = ExportOptions::default().with_quality(Quality::High);

        let receipt = exporter
            .export_page("My K-pop Collection!", 2, &cards, "#fff", options)
            .await
            .unwrap();
        assert_eq!(receipt.filename, "my-k-pop-collection-page-2.pdf");
        assert_eq!(receipt.cards, 3);
        assert_eq!(receipt.dropped, 0);

        let html = std::fs::read_to_string(dir.path().join("my-k-pop-collection-page-2.html")).unwrap();
        assert!(html.contains("My K-pop Collection! - Page 2"));
        assert_eq!(html.matches("class=\"empty-slot\"").count(), 9);
    }

    #[tokio::test]
    async fn test_extra_cards_not_fetched() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        let cards = cards(&exporter, 14);

        let receipt = exporter
            .export_page("B", 1, &cards, "#fff", ExportOptions::default().with_quality(Quality::High))
            .await
            .unwrap();
        assert_eq!(receipt.cards, 12);
        assert_eq!(receipt.dropped, 2);
        assert_eq!(exporter.resolver().fetcher().fetch_count(), 12);
    }

    #[tokio::test]
    async fn test_image_failure_opens_no_surface() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        let cards = vec![Card::new("c1", "Lost", ImageRef::from_url("mem://gone"))];

        let err = exporter
            .export_page("B", 1, &cards, "#fff", ExportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Image(ImageError::Status { status: 404, .. })));
        assert!(!dir.path().join("b-page-1.html").exists());
    }

    #[tokio::test]
    async fn test_export_binder_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        let binder = Binder::new("b1", "Aespa").with_cards(cards(&exporter, 10));

        let receipts = exporter
            .export_binder(
                &binder,
                NonZeroUsize::new(4).unwrap(),
                ExportOptions::default().with_quality(Quality::High),
            )
            .await
            .unwrap();
        let names: Vec<&str> = receipts.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["aespa-page-1.pdf", "aespa-page-2.pdf", "aespa-page-3.pdf"]);
        assert_eq!(receipts[2].cards, 2);
    }
}
