use crate::compute::freshness::{Freshness, FreshnessPolicy};
use chrono::{DateTime, Utc};
use spawngrid_types::bucket::{BucketCoordinate, BucketRecord};

/// Fetched buckets split by whether their contents can be served as-is.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    pub reusable: Vec<BucketRecord>,
    pub to_regenerate: Vec<BucketCoordinate>,
    pub stale: usize,
}

impl Partition {
    /// Stale records are dropped here; nothing of them is merged.
    pub fn classify(
        fetched: Vec<(BucketCoordinate, Option<BucketRecord>)>,
        policy: &FreshnessPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let mut partition = Self::default();
        for (cell, record) in fetched {
            match policy.classify(record.as_ref(), now) {
                Freshness::Fresh => {
                    if let Some(record) = record {
                        partition.reusable.push(record);
                    }
                }
                Freshness::Stale => {
                    partition.stale += 1;
                    partition.to_regenerate.push(cell);
                }
                Freshness::Missing => partition.to_regenerate.push(cell),
            }
        }
        partition
    }
}
