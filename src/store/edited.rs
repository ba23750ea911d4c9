//! Locally edited card images.
//!
//! When a user decorates a card with stickers, the composited image is kept
//! on this device under `edited_card_<cardId>` and shown in place of the
//! card's stored blob until the entry is cleared. Entries are never synced to
//! the backend and never expire.

use tracing::{debug, warn};

use crate::core::CardId;
use crate::images::DataUrl;

use super::{KeyValueStore, NamespacedStore, StoreError};

/// Key prefix of edited-image entries.
pub const EDITED_CARD_PREFIX: &str = "edited_card_";

/// Edited-image cache over any key-value store.
#[derive(Clone, Debug)]
pub struct EditedImageCache<S> {
    store: NamespacedStore<S>,
}

impl<S: KeyValueStore> EditedImageCache<S> {
    /// Keep edited images in `store`, under the `edited_card_` prefix.
    pub fn new(store: S) -> Self {
        Self {
            store: NamespacedStore::new(store, EDITED_CARD_PREFIX),
        }
    }

    /// Store the edited image for a card, replacing any earlier edit.
    pub fn save(&self, card: &CardId, image: &DataUrl) -> Result<(), StoreError> {
        self.store.set(card.as_str(), image.as_str())?;
        debug!(card = %card, "saved edited image");
        Ok(())
    }

    /// The edited image for a card, if one is cached.
    ///
    /// A store failure or an unreadable entry is logged and treated as a
    /// miss, so display falls back to the stored blob.
    #[must_use]
    pub fn get(&self, card: &CardId) -> Option<DataUrl> {
        let raw = match self.store.get(card.as_str()) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(card = %card, error = %e, "failed to read edited image");
                return None;
            }
        };
        match DataUrl::parse(&raw) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(card = %card, error = %e, "ignoring unreadable edited image");
                None
            }
        }
    }

    /// Check if a card has an edited image.
    #[must_use]
    pub fn contains(&self, card: &CardId) -> bool {
        self.get(card).is_some()
    }

    /// Drop the edited image for a card.
    pub fn clear(&self, card: &CardId) -> Result<(), StoreError> {
        self.store.remove(card.as_str())
    }

    /// Drop every edited image, leaving other keys in the store alone.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.store.clear()
    }

    /// Cards with an edited image.
    pub fn cards(&self) -> Result<Vec<CardId>, StoreError> {
        Ok(self.store.keys()?.into_iter().map(CardId::from).collect())
    }
}
