//! Memory store persisted through periodic snapshots.

use super::persistence::SnapshotFile;
use super::{BucketStore, MemoryStore, StoreStats};
use crate::config::SnapshotConfig;
use crate::error::{Result, SpawnError};
use async_trait::async_trait;
use spawngrid_types::bucket::BucketRecord;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Bucket store that serves from memory and writes the whole map to a
/// snapshot file every `auto_snapshot_puts` puts and on [`sync`](BucketStore::sync).
///
/// Records put since the last snapshot are lost if the process dies.
///
/// A `put` lands in memory first and is served from there right away. If the
/// automatic snapshot it triggers fails, the failure is logged, the put still
/// succeeds, and the next put retries the snapshot. Only [`sync`](BucketStore::sync)
/// reports snapshot failures to the caller.
pub struct SnapshotStore {
    memory: MemoryStore,
    file: SnapshotFile,
    puts_since_snapshot: AtomicUsize,
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    /// Open the snapshot at `path`, loading any records it holds.
    pub fn open<P: AsRef<Path>>(path: P, config: SnapshotConfig) -> Result<Self> {
        let file = SnapshotFile::new(path, config);
        let records = file.load()?;
        log::info!(
            "Loaded {} bucket records from {}",
            records.len(),
            file.path().display()
        );

        Ok(Self {
            memory: MemoryStore::from_records(records),
            file,
            puts_since_snapshot: AtomicUsize::new(0),
            write_lock: Mutex::new(()),
        })
    }

    pub fn stats(&self) -> StoreStats {
        self.memory.stats()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn write_snapshot(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let pending = self.puts_since_snapshot.load(Ordering::Relaxed);

        let records = self.memory.records();
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.save(&records))
            .await
            .map_err(|e| SpawnError::Io(std::io::Error::other(e)))??;

        self.puts_since_snapshot.fetch_sub(pending, Ordering::Relaxed);

        log::debug!("Wrote snapshot to {}", self.file.path().display());
        Ok(())
    }
}

#[async_trait]
impl BucketStore for SnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<BucketRecord>> {
        Ok(self.memory.get_now(key))
    }

    async fn put(&self, record: &BucketRecord) -> Result<()> {
        self.memory.put_now(record);

        let pending = self.puts_since_snapshot.fetch_add(1, Ordering::Relaxed) + 1;
        if self.file.should_snapshot(pending)
            && let Err(e) = self.write_snapshot().await
        {
            log::error!(
                "Snapshot to {} failed, will retry: {}",
                self.file.path().display(),
                e
            );
        }
        Ok(())
    }

    async fn sync(&self) -> Result<()> {
        self.write_snapshot().await
    }
}
