//! In-memory key-value store using DashMap (fallback when Upstash is unavailable)

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracker_core::{KeyValueStore, Result};

/// Process-local string map. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.get(key).map(|entry| entry.value().clone())
    }

    /// Set a value, replacing any previous one
    pub fn insert(&self, key: String, value: String) {
        self.data.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(MemoryStore::get(self, key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.insert("key1".to_string(), "one".to_string());
        assert_eq!(store.get("key1"), Some("one".to_string()));

        // Non-existent key
        assert_eq!(store.get("nonexistent"), None);

        // Overwrite
        store.insert("key1".to_string(), "uno".to_string());
        assert_eq!(store.get("key1"), Some("uno".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        other.insert("key1".to_string(), "one".to_string());
        assert_eq!(store.get("key1"), Some("one".to_string()));
    }

    #[tokio::test]
    async fn test_store_trait() {
        let store = MemoryStore::new();
        let kv: &dyn KeyValueStore = &store;

        kv.set("key1", "one").await.unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), Some("one".to_string()));
        assert_eq!(kv.get("key2").await.unwrap(), None);
        assert_eq!(kv.name(), "memory");
    }
}
