//! In-memory bucket store.

use super::{BucketStore, StoreStats};
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use spawngrid_types::bucket::BucketRecord;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory bucket store using HashMap
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<FxHashMap<String, BucketRecord>>,
    gets: AtomicU64,
    puts: AtomicU64,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`, keyed by their ids.
    ///
    /// Loading does not count towards the put counter.
    pub fn from_records(records: impl IntoIterator<Item = BucketRecord>) -> Self {
        let data = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            data: RwLock::new(data),
            ..Self::default()
        }
    }

    /// Copy of every stored record, sorted by id.
    pub fn records(&self) -> Vec<BucketRecord> {
        let mut records: Vec<_> = self.data.read().values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            key_count: self.len(),
            get_count: self.gets.load(Ordering::Relaxed),
            put_count: self.puts.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn get_now(&self, key: &str) -> Option<BucketRecord> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.data.read().get(key).cloned()
    }

    pub(crate) fn put_now(&self, record: &BucketRecord) {
        self.puts.fetch_add(1, Ordering::Relaxed);
        self.data.write().insert(record.id.clone(), record.clone());
    }
}

#[async_trait]
impl BucketStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<BucketRecord>> {
        Ok(self.get_now(key))
    }

    async fn put(&self, record: &BucketRecord) -> Result<()> {
        self.put_now(record);
        Ok(())
    }
}
