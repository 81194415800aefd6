use crate::core::state::StateStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "state";

/// State store backed by a fjall keyspace on disk.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open state store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open state partition")?;
        debug!(path = %path.display(), "Opened state store");

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl StateStore for DiskStore {
    async fn get(&self, key: &str) -> Option<String> {
        let res: Result<Option<String>> = (|| {
            let Some(value) = self.partition.get(key.as_bytes())? else {
                return Ok(None);
            };
            Ok(Some(String::from_utf8(value.to_vec())?))
        })();

        match res {
            Ok(value) => {
                debug!(key, hit = value.is_some(), "State GET");
                value
            }
            Err(e) => {
                debug!("DiskStore get error: {}", e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition
            .insert(key.as_bytes(), value.as_bytes())
            .with_context(|| format!("Failed to write state key {key}"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush state store")?;
        debug!(key, "State SET");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_store_get_set() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        assert!(store.get("lastAddress").await.is_none());

        store.set("lastAddress", "0xabc").await.unwrap();
        store.set("lastChain", "matic-mainnet").await.unwrap();
        assert_eq!(store.get("lastAddress").await.as_deref(), Some("0xabc"));
        assert_eq!(store.get("lastChain").await.as_deref(), Some("matic-mainnet"));

        store.set("lastAddress", "0xdef").await.unwrap();
        assert_eq!(store.get("lastAddress").await.as_deref(), Some("0xdef"));
    }
}
