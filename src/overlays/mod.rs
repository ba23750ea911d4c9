//! Card overlays: condition stickers, rarity badges, the legendary glint and
//! the quantity badge.
//!
//! `CardOverlays` is the single decision point for what is drawn on top of a
//! card image. The session view model and the export renderer both build
//! their decorations from it.
//!
//! ```
//! use std::num::NonZeroU32;
//! use photocard_binder::core::{Card, Condition, ImageRef, Rarity};
//! use photocard_binder::overlays::CardOverlays;
//!
//! let card = Card::new("c1", "Karina", ImageRef::from_url("https://blobs.example/c1"))
//!     .with_rarity(Rarity::Legendary)
//!     .with_condition(Condition::Good)
//!     .with_quantity(NonZeroU32::new(2).unwrap());
//!
//! let overlays = CardOverlays::for_card(&card);
//! assert!(overlays.glint.is_some());
//! assert_eq!(overlays.sticker, Some("/assets/generated/price-tag-played.dim_512x512.png"));
//! assert_eq!(overlays.quantity, Some(2));
//! ```

pub mod assets;

pub use assets::{all_overlay_assets, condition_sticker, glint_overlay, rarity_badge, should_show_glint};

use serde::Serialize;

use crate::core::Card;

/// Everything drawn on top of one card image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CardOverlays {
    /// Holographic glint texture (legendary cards).
    pub glint: Option<&'static str>,
    /// Condition price-tag sticker, top-right.
    pub sticker: Option<&'static str>,
    /// Rarity badge, bottom-left.
    pub badge: Option<&'static str>,
    /// Copy count, shown only for duplicates.
    pub quantity: Option<u32>,
}

impl CardOverlays {
    /// Overlays for a card.
    #[must_use]
    pub fn for_card(card: &Card) -> Self {
        Self {
            glint: should_show_glint(card.rarity).then(glint_overlay),
            sticker: condition_sticker(card.condition),
            badge: rarity_badge(card.rarity),
            quantity: card.has_duplicates().then(|| card.quantity.get()),
        }
    }

    /// Check if nothing is drawn over the card.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ImageRef, Rarity};

    #[test]
    fn test_plain_card_has_no_overlays() {
        let card = Card::new("c1", "plain", ImageRef::from_url("u"));
        assert!(CardOverlays::for_card(&card).is_empty());
    }

    #[test]
    fn test_rare_card_has_badge_without_glint() {
        let card = Card::new("c1", "rare", ImageRef::from_url("u")).with_rarity(Rarity::Rare);
        let overlays = CardOverlays::for_card(&card);
        assert_eq!(overlays.badge, Some(assets::BADGE_RARE));
        assert_eq!(overlays.glint, None);
        assert_eq!(overlays.quantity, None);
    }
}
