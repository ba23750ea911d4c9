//! Photocards and their collector metadata.
//!
//! A `Card` is one entry in a binder: an image plus the metadata a collector
//! tracks for it (how many copies, how rare, what shape it is in).
//!
//! ## Position
//!
//! `CardPosition` is advisory. The page a card is displayed on is always
//! recomputed from its index in the binder's ordered card list, never from
//! the stored page/slot pair.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CardId;

/// Rarity tier of a card.
///
/// Serialized with the backend's camelCase names (`ultraRare`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rarity {
    /// No rarity recorded.
    #[default]
    None,
    Common,
    Rare,
    Legendary,
    UltraRare,
}

impl Rarity {
    /// Every rarity value, in declaration order.
    pub const ALL: [Rarity; 5] = [
        Rarity::None,
        Rarity::Common,
        Rarity::Rare,
        Rarity::Legendary,
        Rarity::UltraRare,
    ];

    /// Wire name of the rarity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Rarity::None => "none",
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
            Rarity::UltraRare => "ultraRare",
        }
    }
}

/// Physical condition of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    /// No condition recorded.
    #[default]
    None,
    Played,
    Fair,
    Good,
    Mint,
    NearMint,
}

impl Condition {
    /// Every condition value, in declaration order.
    pub const ALL: [Condition; 6] = [
        Condition::None,
        Condition::Played,
        Condition::Fair,
        Condition::Good,
        Condition::Mint,
        Condition::NearMint,
    ];

    /// Wire name of the condition.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Condition::None => "none",
            Condition::Played => "played",
            Condition::Fair => "fair",
            Condition::Good => "good",
            Condition::Mint => "mint",
            Condition::NearMint => "nearMint",
        }
    }
}

/// Stored page/slot of a card. Advisory ordering metadata only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardPosition {
    pub page: u32,
    pub slot: u32,
}

impl CardPosition {
    /// Create a position.
    #[must_use]
    pub const fn new(page: u32, slot: u32) -> Self {
        Self { page, slot }
    }
}

/// Reference to an externally stored image blob.
///
/// The blob store hands out direct URLs; a `data:` URL is also accepted for
/// blobs created from in-memory bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Reference a blob by its direct URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The direct URL of the blob.
    #[must_use]
    pub fn direct_url(&self) -> &str {
        &self.0
    }

    /// Check whether the blob is embedded inline as a `data:` URL.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }
}

/// A photocard in a binder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub created: DateTime<Utc>,
    /// Number of copies owned. Zero is rejected on deserialization.
    pub quantity: NonZeroU32,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub position: CardPosition,
    pub image: ImageRef,
}

impl Card {
    /// Create a single-copy card with no rarity or condition.
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, image: ImageRef) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created: Utc::now(),
            quantity: NonZeroU32::MIN,
            rarity: Rarity::None,
            condition: Condition::None,
            position: CardPosition::default(),
            image,
        }
    }

    /// Set the number of copies.
    #[must_use]
    pub fn with_quantity(mut self, quantity: NonZeroU32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the rarity.
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Set the condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Set the stored (advisory) position.
    #[must_use]
    pub fn with_position(mut self, position: CardPosition) -> Self {
        self.position = position;
        self
    }

    /// Check if more than one copy is owned.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.quantity.get() > 1
    }
}
