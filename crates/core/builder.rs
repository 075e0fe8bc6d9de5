//! Builder for bucket caches
//!
//! Picks the store backing a [`BucketCache`]: an explicit store, a snapshot
//! file, or a fresh in-memory map.

use crate::cache::BucketCache;
use crate::config::Config;
use crate::error::{Result, SpawnError};
use crate::storage::{BucketStore, MemoryStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for a [`BucketCache`] with custom settings and storage.
#[derive(Default)]
pub struct BucketCacheBuilder {
    config: Config,
    store: Option<Arc<dyn BucketStore>>,
    snapshot_path: Option<PathBuf>,
}

impl BucketCacheBuilder {
    /// Create a builder with default settings over an in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Serve from `store` instead of an internally created one.
    pub fn store(mut self, store: Arc<dyn BucketStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Keep buckets in memory and persist them to a snapshot at `path`.
    #[cfg(feature = "snapshot")]
    pub fn snapshot_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Build the cache.
    pub fn build(self) -> Result<BucketCache> {
        let store: Arc<dyn BucketStore> = match (self.store, self.snapshot_path) {
            (Some(_), Some(path)) => {
                return Err(SpawnError::Config(format!(
                    "both a store and a snapshot path ({}) were given",
                    path.display()
                )));
            }
            (Some(store), None) => store,
            #[cfg(feature = "snapshot")]
            (None, Some(path)) => Arc::new(crate::storage::SnapshotStore::open(
                path,
                self.config.snapshot.clone(),
            )?),
            #[cfg(not(feature = "snapshot"))]
            (None, Some(_)) => {
                return Err(SpawnError::Config(
                    "snapshot paths require the snapshot feature".to_string(),
                ));
            }
            (None, None) => Arc::new(MemoryStore::new()),
        };

        BucketCache::new(store, self.config)
    }
}
