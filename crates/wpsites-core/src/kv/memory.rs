use std::sync::Arc;

use dashmap::DashMap;

use super::{KeyValueStore, StorageError, check_key};

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        check_key(key)?;
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("sites", "[]".into()).await.unwrap();
        assert_eq!(b.get("sites").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(b.keys(), vec!["sites".to_owned()]);
    }

    #[tokio::test]
    async fn delete_missing_key_is_ok() {
        let store = MemoryStore::new();
        store.delete("nope").await.unwrap();
        assert!(store.is_empty());
    }
}
