//! Static overlay asset paths.
//!
//! Both the on-screen card view and the print export read overlay paths from
//! here, so the two render paths cannot drift apart.

use crate::core::{Condition, Rarity};

pub const STICKER_MINT: &str = "/assets/generated/price-tag-mint.dim_512x512.png";
pub const STICKER_NEAR_MINT: &str = "/assets/generated/price-tag-near-mint.dim_512x512.png";
pub const STICKER_PLAYED: &str = "/assets/generated/price-tag-played.dim_512x512.png";

pub const BADGE_COMMON: &str = "/assets/generated/rarity-common.dim_128x128.png";
pub const BADGE_RARE: &str = "/assets/generated/rarity-rare.dim_128x128.png";
pub const BADGE_LEGENDARY: &str = "/assets/generated/rarity-legendary.dim_128x128.png";
pub const BADGE_ULTRA_RARE: &str = "/assets/generated/rarity-epic.dim_128x128.png";

pub const GLINT: &str = "/assets/generated/stickers-pack-01.dim_1024x1024.png";

/// Price-tag sticker for a condition.
///
/// Good and Fair have no sticker of their own and share the Played one.
#[must_use]
pub const fn condition_sticker(condition: Condition) -> Option<&'static str> {
    match condition {
        Condition::Mint => Some(STICKER_MINT),
        Condition::NearMint => Some(STICKER_NEAR_MINT),
        Condition::Played | Condition::Good | Condition::Fair => Some(STICKER_PLAYED),
        Condition::None => None,
    }
}

/// Corner badge for a rarity tier.
#[must_use]
pub const fn rarity_badge(rarity: Rarity) -> Option<&'static str> {
    match rarity {
        Rarity::Common => Some(BADGE_COMMON),
        Rarity::Rare => Some(BADGE_RARE),
        Rarity::Legendary => Some(BADGE_LEGENDARY),
        Rarity::UltraRare => Some(BADGE_ULTRA_RARE),
        Rarity::None => None,
    }
}

/// Check if the holographic glint is drawn over the card. Legendary only.
#[must_use]
pub const fn should_show_glint(rarity: Rarity) -> bool {
    matches!(rarity, Rarity::Legendary)
}

/// Holographic glint texture.
#[must_use]
pub const fn glint_overlay() -> &'static str {
    GLINT
}

/// Every distinct overlay asset, for preloading.
#[must_use]
pub fn all_overlay_assets() -> Vec<&'static str> {
    let mut assets: Vec<&'static str> = Condition::ALL
        .into_iter()
        .filter_map(condition_sticker)
        .chain(Rarity::ALL.into_iter().filter_map(rarity_badge))
        .collect();
    assets.push(GLINT);
    assets.dedup();
    assets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_overlay() {
        assert_eq!(condition_sticker(Condition::None), None);
        assert_eq!(rarity_badge(Rarity::None), None);
        assert!(!should_show_glint(Rarity::None));
    }

    #[test]
    fn test_good_and_fair_share_played_sticker() {
        assert_eq!(condition_sticker(Condition::Good), Some(STICKER_PLAYED));
        assert_eq!(condition_sticker(Condition::Fair), Some(STICKER_PLAYED));
        assert_eq!(condition_sticker(Condition::Played), Some(STICKER_PLAYED));
    }

    #[test]
    fn test_ultra_rare_uses_epic_badge() {
        assert_eq!(
            rarity_badge(Rarity::UltraRare),
            Some("/assets/generated/rarity-epic.dim_128x128.png")
        );
    }

    #[test]
    fn test_glint_legendary_only() {
        for rarity in Rarity::ALL {
            assert_eq!(should_show_glint(rarity), rarity == Rarity::Legendary);
        }
    }

    #[test]
    fn test_mapping_is_stable() {
        for condition in Condition::ALL {
            assert_eq!(condition_sticker(condition), condition_sticker(condition));
        }
        for rarity in Rarity::ALL {
            assert_eq!(rarity_badge(rarity), rarity_badge(rarity));
        }
    }

    #[test]
    fn test_all_assets_distinct() {
        let assets = all_overlay_assets();
        assert_eq!(assets.len(), 8);
        let mut sorted = assets.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), assets.len());
        assert!(assets.contains(&GLINT));
    }
}
