use super::{KeyValueStore, StoreError};

/// A view of a store in which every key carries a fixed prefix.
///
/// `clear` and `keys` only see keys under the prefix, so several concerns can
/// share one backing store.
#[derive(Clone, Debug)]
pub struct NamespacedStore<S> {
    inner: S,
    prefix: String,
}

impl<S: KeyValueStore> NamespacedStore<S> {
    /// Wrap `inner`, prefixing every key with `prefix`.
    pub fn new(inner: S, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    /// The key prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The backing store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<S: KeyValueStore> KeyValueStore for NamespacedStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(&self.full_key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.full_key(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.full_key(key))
    }

    fn clear(&self) -> Result<(), StoreError> {
        for key in self.inner.keys()? {
            if key.starts_with(&self.prefix) {
                self.inner.remove(&key)?;
            }
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .inner
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(self.prefix.as_str()).map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_prefixing() {
        let backing = Arc::new(MemoryStore::new());
        let ns = NamespacedStore::new(Arc::clone(&backing), "edited_card_");

        ns.set("c1", "x").unwrap();
        assert_eq!(backing.get("edited_card_c1").unwrap().as_deref(), Some("x"));
        assert_eq!(ns.keys().unwrap(), vec!["c1".to_string()]);
    }

    #[test]
    fn test_clear_leaves_other_namespaces() {
        let backing = Arc::new(MemoryStore::new());
        let edited = NamespacedStore::new(Arc::clone(&backing), "edited_card_");
        backing.set("binder-accent-color", "rose").unwrap();
        edited.set("c1", "x").unwrap();
        edited.set("c2", "y").unwrap();

        edited.clear().unwrap();

        assert!(edited.keys().unwrap().is_empty());
        assert_eq!(backing.get("binder-accent-color").unwrap().as_deref(), Some("rose"));
    }
}
