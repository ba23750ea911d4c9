//! Print-ready export of a single binder page.
//!
//! A page export resolves every card image to an inline data URL, renders a
//! self-contained HTML document sized for A4 or Letter paper, and hands it to
//! a [`PrintHost`]. The host decides what "printing" means: the bundled
//! [`FilePrintHost`] writes the document to a directory for a browser or the
//! OS to print.
//!
//! ## Key Types
//!
//! - [`PageDocument`]: the rendered page (askama template)
//! - [`ExportOptions`]: paper size and image quality
//! - [`PrintHost`] / [`PrintSurface`]: where the document goes
//! - [`PageExporter`]: the resolve, render, print pipeline
//!
//! ## Usage
//!
//! ```
//! use photocard_binder::core::{Card, ImageRef};
//! use photocard_binder::export::{PageDocument, PageSize, ResolvedCard};
//! use photocard_binder::images::DataUrl;
//!
//! let card = Card::new("c1", "Wonyoung", ImageRef::from_url("mem://c1"));
//! let image = DataUrl::from_parts("image/png", b"png");
//!
//! let html = PageDocument::new("Dive", 1, PageSize::A4)
//!     .with_cards([ResolvedCard::new(&card, image)])
//!     .render()
//!     .unwrap();
//! assert!(html.contains("<title>Dive - Page 1</title>"));
//! assert!(html.contains("size: 210mm 297mm"));
//! ```

pub mod filename;
pub mod document;
pub mod print;
pub mod pipeline;

pub use filename::{generate_filename, slugify};
pub use document::{ExportOptions, PageDocument, PageSize, ResolvedCard, DEFAULT_PAGE_BACKGROUND, PAGE_SLOTS};
pub use print::{FilePrintHost, FilePrintSurface, PrintHost, PrintSurface};
pub use pipeline::{ExportReceipt, PageExporter};
pub use crate::images::Quality;

use thiserror::Error;

use crate::images::ImageError;

/// Errors from exporting a page.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The host could not open a print surface.
    #[error("Failed to open print window. Please allow popups for this site.")]
    PopupBlocked,

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("failed to render print page: {0}")]
    Render(#[from] askama::Error),

    #[error("failed to write print page: {0}")]
    Io(#[from] std::io::Error),
}
