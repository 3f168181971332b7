//! Key-value persistence boundary.
//!
//! The accumulator and the field registry persist through [`PersistentStore`]
//! only; how the bytes are kept (browser cookie, local storage, a file) is the
//! implementor's concern. Values carry a time-to-live and vanish once it
//! elapses.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::StoreError;

/// String key-value store with per-key expiry.
pub trait PersistentStore {
    /// Returns the stored value, or `None` if absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores a value that expires after `ttl`.
    fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Removes a value. Removing a missing key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Instant,
}

/// In-process [`PersistentStore`] honoring TTLs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, StoredValue>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.values.values().filter(|v| v.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .values
            .get(key)
            .filter(|v| v.expires_at > Instant::now())
            .map(|v| v.value.clone()))
    }

    fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| StoreError::Unavailable(format!("ttl {:?} out of range", ttl)))?;
        debug!(key, len = value.len(), ?ttl, "store set");
        self.values.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        debug!(key, "store delete");
        self.values.remove(key);
        Ok(())
    }
}

impl<S: PersistentStore + ?Sized> PersistentStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        (**self).set(key, value, ttl)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);

        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.delete("k").unwrap();
    }

    #[test]
    fn test_expired_value_is_absent() {
        let mut store = MemoryStore::new();
        store.set("k", "v", Duration::ZERO).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_boxed_store() {
        let mut store: Box<dyn PersistentStore> = Box::new(MemoryStore::new());
        store.set("k", "v", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
