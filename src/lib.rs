//! # photocard-binder
//!
//! Client core of a digital photocard binder: collectors keep cards in
//! themed binders, page through them in a grid, rearrange them by drag and
//! drop, decorate them with stickers and export pages for printing.
//!
//! ## Design Principles
//!
//! 1. **Order is the source of truth**: a card's page is a pure function of
//!    its index and the page capacity. Nothing stores page membership.
//!
//! 2. **The backend is a trait**: every remote operation goes through
//!    `BinderBackend`, wrapped in a timeout. An in-memory implementation
//!    backs the tests.
//!
//! 3. **One overlay decision**: the view model and the print renderer draw
//!    the same stickers, badges and glint from `CardOverlays`.
//!
//! ## Architecture
//!
//! - **Edited images win**: an image saved from the sticker editor is used
//!   instead of the stored blob until it is cleared.
//!
//! - **Persistent card order**: the reorder controller keeps the order in an
//!   `im::Vector`, so a pre-move snapshot for rollback is O(1).
//!
//! ## Modules
//!
//! - `core`: ids, cards, binders, themes, layouts, configuration, errors
//! - `pagination`: page math, the pager and swipe gestures
//! - `overlays`: condition stickers, rarity badges, glint, quantity
//! - `images`: data URLs, blob fetching, upload validation, resolution
//! - `store`: key-value stores, the edited-image cache, preferences
//! - `backend`: the backend contract, timeouts, retry, in-memory backend
//! - `export`: print page rendering and print hosts
//! - `reorder`: drag state, card order, persisted moves
//! - `session`: an opened binder and its view model
//! - `editor`: sticker placement and compositing
//! - `admin`: master-key gate, users, presets, content, payments

pub mod core;
pub mod pagination;
pub mod overlays;
pub mod images;
pub mod store;
pub mod backend;
pub mod export;
pub mod reorder;
pub mod session;
pub mod editor;
pub mod admin;

// Re-export commonly used types
pub use crate::core::{
    BinderId, CardId, UserId,
    Card, CardPosition, Condition, ImageRef, Rarity,
    Binder, Theme, GridLayout, BinderConfig,
    Error, ErrorKind, NotFound, ValidationError,
};

pub use crate::pagination::{Page, Pager, SwipeDirection, SwipeTracker};

pub use crate::overlays::CardOverlays;

pub use crate::images::{BlobFetcher, DataUrl, HttpBlobFetcher, ImageError, ImageResolver, Quality};

pub use crate::store::{EditedImageCache, FileStore, KeyValueStore, MemoryStore, StoreError};

pub use crate::backend::{BackendError, BinderBackend, MemoryBackend, TimedBackend};

pub use crate::export::{
    generate_filename, ExportError, ExportOptions, FilePrintHost, PageDocument, PageExporter,
    PageSize, PrintHost, PrintSurface,
};

pub use crate::reorder::{BinderOrder, DragState, ReorderController, RollbackPolicy};

pub use crate::session::{BinderSession, CardView};

pub use crate::editor::{StickerCanvas, StickerKind, StickerSheet};

pub use crate::admin::{AdminPortal, MasterKeyGate};
