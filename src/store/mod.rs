pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::state::StateStore;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::warn;

/// Opens the on-disk state store under the configured data path. Falls back
/// to an in-memory store so a broken data directory never blocks viewing.
pub fn open_state_store(config: &AppConfig) -> Arc<dyn StateStore> {
    let opened = config
        .default_data_path()
        .and_then(|path| DiskStore::open(&path.join("state")));

    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "State will not be persisted this session");
            Arc::new(MemoryStore::new())
        }
    }
}
