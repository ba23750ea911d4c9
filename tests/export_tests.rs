//! Export pipeline integration tests.
//!
//! These tests drive page exports end to end: image resolution with the
//! edited-image cache, rendering, and the file print host.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use proptest::prelude::*;

use photocard_binder::core::{Card, CardId, Error, ErrorKind, ImageRef, Rarity};
use photocard_binder::export::{
    generate_filename, slugify, ExportError, ExportOptions, FilePrintHost, PageExporter, PageSize,
    PrintHost, PrintSurface,
};
use photocard_binder::images::{DataUrl, ImageResolver, MemoryBlobFetcher, Quality};
use photocard_binder::store::{EditedImageCache, MemoryStore};

type Exporter<H> = PageExporter<Arc<MemoryBlobFetcher>, Arc<MemoryStore>, H>;

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::new(width, height))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn exporter<H: PrintHost>(host: H) -> Exporter<H> {
    init_tracing();
    let resolver = ImageResolver::new(
        Arc::new(MemoryBlobFetcher::new()),
        EditedImageCache::new(Arc::new(MemoryStore::new())),
    );
    PageExporter::new(resolver, host)
}

fn add_card<H: PrintHost>(exporter: &Exporter<H>, id: &str, bytes: Vec<u8>) -> Card {
    let image = exporter.resolver().fetcher().insert(format!("mem://{id}"), bytes);
    Card::new(id, format!("Card {id}"), image)
}

/// Records every surface call in order.
#[derive(Clone, Default)]
struct RecordingHost {
    log: Arc<Mutex<Vec<String>>>,
    blocked: bool,
}

struct RecordingSurface {
    log: Arc<Mutex<Vec<String>>>,
}

impl PrintHost for RecordingHost {
    fn open_surface(&self, filename: &str) -> Result<Box<dyn PrintSurface>, ExportError> {
        if self.blocked {
            return Err(ExportError::PopupBlocked);
        }
        self.log.lock().unwrap().push(format!("open {filename}"));
        Ok(Box::new(RecordingSurface {
            log: Arc::clone(&self.log),
        }))
    }
}

impl PrintSurface for RecordingSurface {
    fn write(&mut self, document: &str) -> Result<(), ExportError> {
        self.log.lock().unwrap().push(format!("write {}", !document.is_empty()));
        Ok(())
    }

    fn print(&mut self) -> Result<(), ExportError> {
        self.log.lock().unwrap().push("print".to_string());
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), ExportError> {
        self.log.lock().unwrap().push("close".to_string());
        Ok(())
    }
}

// =============================================================================
// Filename Tests
// =============================================================================

/// Test the documented filename example.
#[test]
fn test_filename_example() {
    assert_eq!(
        generate_filename("My K-pop Collection!", 2),
        "my-k-pop-collection-page-2.pdf"
    );
}

proptest! {
    /// Slugs only hold lowercase letters, digits and single inner hyphens.
    #[test]
    fn prop_slug_shape(name in ".{0,40}") {
        let slug = slugify(&name);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    /// The same name and page always give the same file name.
    #[test]
    fn prop_filename_deterministic(name in "[A-Za-z0-9 !_-]{1,30}", page in 1usize..100) {
        let first = generate_filename(&name, page);
        prop_assert_eq!(&first, &generate_filename(&name, page));
        let suffix = format!("-page-{page}.pdf");
        prop_assert!(first.ends_with(&suffix));
    }
}

// =============================================================================
// Pipeline Tests
// =============================================================================

/// Test that export resolves, opens, writes, prints and closes in order.
#[tokio::test]
async fn test_pipeline_order() {
    let host = RecordingHost::default();
    let exporter = exporter(host.clone());
    let cards = vec![add_card(&exporter, "a", b"a".to_vec())];

    let receipt = exporter
        .export_page("Dive", 3, &cards, "#fff", ExportOptions::default().with_quality(Quality::High))
        .await
        .unwrap();

    assert_eq!(receipt.filename, "dive-page-3.pdf");
    let log = host.log.lock().unwrap().clone();
    assert_eq!(log, ["open dive-page-3.pdf", "write true", "print", "close"]);
}

/// Test that a blocked host is reported distinctly with remediation text.
#[tokio::test]
async fn test_popup_blocked() {
    let host = RecordingHost {
        blocked: true,
        ..RecordingHost::default()
    };
    let exporter = exporter(host);
    let cards = vec![add_card(&exporter, "a", b"a".to_vec())];

    let err = exporter
        .export_page("Dive", 1, &cards, "#fff", ExportOptions::default().with_quality(Quality::High))
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::PopupBlocked));

    let err = Error::from(err);
    assert_eq!(err.kind(), ErrorKind::PopupBlocked);
    assert!(err.user_message().contains("allow popups"));
}

/// Test that a missing output directory behaves like a blocked popup.
#[tokio::test]
async fn test_file_host_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = exporter(FilePrintHost::new(dir.path().join("nope")));
    let cards = vec![add_card(&exporter, "a", b"a".to_vec())];

    let err = exporter
        .export_page("Dive", 1, &cards, "#fff", ExportOptions::default().with_quality(Quality::High))
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::PopupBlocked));
}

/// Test the written page for a Letter export with overlays.
#[tokio::test]
async fn test_file_host_writes_page() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = exporter(FilePrintHost::new(dir.path()));
    let legendary = add_card(&exporter, "a", b"a".to_vec()).with_rarity(Rarity::Legendary);
    let cards = vec![legendary, add_card(&exporter, "b", b"b".to_vec())];

    let options = ExportOptions::default()
        .with_page_size(PageSize::Letter)
        .with_quality(Quality::High);
    exporter.export_page("Kep1er", 1, &cards, "#FFF8F0", options).await.unwrap();

    let html = std::fs::read_to_string(dir.path().join("kep1er-page-1.html")).unwrap();
    assert!(html.contains("size: 8.5in 11in"));
    assert!(html.contains("<title>Kep1er - Page 1</title>"));
    assert_eq!(html.matches("class=\"glint\"").count(), 1);
    assert_eq!(html.matches("class=\"empty-slot\"").count(), 10);
    assert!(html.contains("Ready to save as PDF!"));
}

// =============================================================================
// Image Resolution Tests
// =============================================================================

/// Test that an edited image keeps winning after the blob changes, until
/// the cache entry is cleared.
#[tokio::test]
async fn test_edited_image_precedence() {
    let exporter = exporter(RecordingHost::default());
    let resolver = exporter.resolver();
    let card = CardId::new("c1");
    let image = resolver.fetcher().insert("mem://c1", b"original".to_vec());

    let edited = DataUrl::from_parts("image/png", b"edited");
    resolver.cache().save(&card, &edited).unwrap();

    resolver.fetcher().insert("mem://c1", b"replaced".to_vec());
    assert_eq!(resolver.resolve(&card, &image).await.unwrap(), edited);
    assert_eq!(resolver.fetcher().fetch_count(), 0);

    resolver.cache().clear(&card).unwrap();
    let fetched = resolver.resolve(&card, &image).await.unwrap();
    assert_eq!(fetched.decode().unwrap(), b"replaced");
}

/// Test that standard quality shrinks large blobs but keeps small ones.
#[tokio::test]
async fn test_standard_quality_downscales() {
    let exporter = exporter(RecordingHost::default());
    let resolver = exporter.resolver();
    let big = resolver.fetcher().insert("mem://big", png(2400, 1200));
    let small = resolver.fetcher().insert("mem://small", png(300, 450));

    let url = resolver
        .resolve_with_quality(&CardId::new("big"), &big, Quality::Standard)
        .await
        .unwrap();
    assert_eq!(url.mime_type(), "image/jpeg");
    let img = image::load_from_memory(&url.decode().unwrap()).unwrap();
    assert_eq!(img.dimensions(), (1200, 600));

    let url = resolver
        .resolve_with_quality(&CardId::new("small"), &small, Quality::Standard)
        .await
        .unwrap();
    assert_eq!(url.mime_type(), "image/png");

    let url = resolver
        .resolve_with_quality(&CardId::new("big"), &big, Quality::High)
        .await
        .unwrap();
    assert_eq!(url.mime_type(), "image/png");
}

/// Test that an unreachable blob fails the export without printing.
#[tokio::test]
async fn test_missing_blob_fails_export() {
    let host = RecordingHost::default();
    let exporter = exporter(host.clone());
    let cards = vec![Card::new("x", "Gone", ImageRef::from_url("mem://gone"))];

    let err = exporter
        .export_page("B", 1, &cards, "#fff", ExportOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::Image(_)));
    assert!(host.log.lock().unwrap().is_empty());
}

/// Test that standard quality embeds bytes it cannot decode instead of
/// failing the page.
#[tokio::test]
async fn test_standard_quality_keeps_undecodable_blob() {
    let host = RecordingHost::default();
    let exporter = exporter(host.clone());
    let cards = vec![add_card(&exporter, "raw", b"\x00\x01 not an image".to_vec())];

    let receipt = exporter
        .export_page("B", 1, &cards, "#fff", ExportOptions::default())
        .await
        .unwrap();
    assert_eq!(receipt.filename, "b-page-1.pdf");
    assert_eq!(host.log.lock().unwrap().last().map(String::as_str), Some("close"));

    let url = exporter
        .resolver()
        .resolve_with_quality(&CardId::new("raw"), &cards[0].image, Quality::Standard)
        .await
        .unwrap();
    assert_eq!(url.decode().unwrap(), b"\x00\x01 not an image");
}
