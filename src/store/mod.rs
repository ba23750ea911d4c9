//! Local key-value persistence.
//!
//! Browser-local state (the edited-image cache and the accent colour) lives
//! behind the injected `KeyValueStore` trait so it can be swapped for an
//! in-memory fake in tests.
//!
//! ## Key Types
//!
//! - `KeyValueStore`: get/set/remove/clear over string keys and values
//! - `MemoryStore`: process-local store
//! - `FileStore`: store persisted as a bincode snapshot on disk
//! - `NamespacedStore`: prefixes every key so concerns cannot collide
//! - `EditedImageCache`: `edited_card_<cardId>` data URLs
//! - `AccentPreference`: the `binder-accent-color` preference
//!
//! Reads and writes are synchronous. Nothing coordinates two processes
//! writing the same file; the last write wins.

pub mod memory;
pub mod file;
pub mod namespaced;
pub mod edited;
pub mod preferences;

pub use memory::MemoryStore;
pub use file::FileStore;
pub use namespaced::NamespacedStore;
pub use edited::{EditedImageCache, EDITED_CARD_PREFIX};
pub use preferences::{AccentColor, AccentPalette, AccentPreference, ACCENT_COLOR_KEY};

use std::sync::Arc;

use thiserror::Error;

/// Errors from a local store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store snapshot is corrupt: {0}")]
    Encoding(#[from] bincode::Error),
}

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every key.
    fn clear(&self) -> Result<(), StoreError>;

    /// All keys currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}
