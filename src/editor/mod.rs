//! Sticker editing of card images.
//!
//! A card image is decorated with stickers cut from a single sheet, then
//! flattened to a PNG data URL and stored in the edited-image cache, where
//! the image resolver picks it up in preference to the stored blob.
//!
//! ## Key Types
//!
//! - [`StickerKind`] / [`StickerSheet`]: the six stickers and their pixels
//! - [`StickerCanvas`]: placement, selection, hit-testing and compositing

pub mod stickers;
pub mod compose;

pub use stickers::{StickerKind, StickerSheet, STICKER_SHEET, STICKER_SIZE};
pub use compose::{PlacedSticker, StickerCanvas, ROTATION_STEP};

use thiserror::Error;

use crate::images::ImageError;
use crate::store::StoreError;

/// Errors from the sticker editor.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("sticker sheet is {width}x{height}, too small for the sticker grid")]
    SheetTooSmall { width: u32, height: u32 },

    #[error("failed to decode or encode image: {0}")]
    Codec(#[from] image::ImageError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("failed to save edited image: {0}")]
    Store(#[from] StoreError),
}
