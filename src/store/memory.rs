use crate::core::state::StateStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory state store. Nothing survives the process; used by tests and
/// when the data directory cannot be opened.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        let state = self.inner.lock().await;
        let value = state.get(key).cloned();
        debug!(key, hit = value.is_some(), "State GET");
        value
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.inner.lock().await;
        debug!(key, "State SET");
        state.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_get_set() {
        let store = MemoryStore::new();

        // Initially, store is empty
        assert!(store.get("lastAddress").await.is_none());

        store.set("lastAddress", "0xabc").await.unwrap();
        assert_eq!(store.get("lastAddress").await.as_deref(), Some("0xabc"));

        // Overwrite keeps the latest value
        store.set("lastAddress", "0xdef").await.unwrap();
        assert_eq!(store.get("lastAddress").await.as_deref(), Some("0xdef"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("portfolioHistory", "[]").await.unwrap();
        assert_eq!(other.get("portfolioHistory").await.as_deref(), Some("[]"));
    }
}
