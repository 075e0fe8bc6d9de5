//! Bucket store abstraction for spawngrid
//!
//! The cache only needs keyed `get` and `put` of whole bucket records. This
//! module defines that contract as a trait so backends can be swapped, from
//! the in-memory map used by tests to snapshot-backed or remote stores.

use crate::error::Result;
use async_trait::async_trait;
use spawngrid_types::bucket::BucketRecord;

mod memory;
#[cfg(feature = "snapshot")]
pub mod persistence;
#[cfg(feature = "snapshot")]
mod snapshot_store;

pub use memory::MemoryStore;

#[cfg(feature = "snapshot")]
pub use persistence::SnapshotFile;
#[cfg(feature = "snapshot")]
pub use snapshot_store::SnapshotStore;

/// Keyed storage for bucket records.
///
/// Implementations hold no lifecycle logic of their own: no expiry, no
/// merging. Two concurrent `put`s for the same key race and the last one
/// wins.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Fetch the record stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<BucketRecord>>;

    /// Store `record` under `record.id`, replacing any previous record.
    async fn put(&self, record: &BucketRecord) -> Result<()>;

    /// Flush pending writes to durable storage.
    async fn sync(&self) -> Result<()> {
        Ok(())
    }
}

/// Store call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Records currently held
    pub key_count: usize,
    /// `get` calls served
    pub get_count: u64,
    /// `put` calls served
    pub put_count: u64,
}
