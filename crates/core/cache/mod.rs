//! The bucket cache: points around a coordinate, generated once per cell and
//! reused until they go stale.
//!
//! A lookup touches the 3×3 block of cells around the queried one. Every cell
//! is fetched from the store; fresh records are served as they are, while
//! missing or stale ones are regenerated, written back, and served. Reads
//! and writes each fan out concurrently, bounded by
//! [`Config::max_concurrency`]. The first store failure aborts the lookup.
//!
//! Two lookups racing on the same missing cell both regenerate it and both
//! write; the store keeps whichever lands last. Points are random anyway, so
//! the two callers simply see different draws for that cell.

mod partition;

use crate::builder::BucketCacheBuilder;
use crate::compute::bucket::{self, BucketGrid, Neighborhood};
use crate::compute::freshness::FreshnessPolicy;
use crate::compute::generator::{CoordinateGenerator, EntityKind, stream_rng};
use crate::compute::validation;
use crate::config::Config;
use crate::error::{Result, SpawnError, StoreOperation};
use crate::storage::{BucketStore, MemoryStore};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use partition::Partition;
use spawngrid_types::bucket::{BucketCoordinate, BucketRecord};
use std::sync::Arc;

/// How a lookup was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupReport {
    pub center: BucketCoordinate,
    /// Cells served from fresh stored records
    pub reused: usize,
    /// Cells whose stored record had expired
    pub stale: usize,
    /// Cells generated during this lookup (stale plus missing)
    pub regenerated: usize,
}

/// Result of a lookup: the merged points of all nine cells, keyed by the
/// queried cell and stamped with the request time.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub record: BucketRecord,
    pub report: LookupReport,
}

pub struct BucketCache {
    store: Arc<dyn BucketStore>,
    config: Config,
    grid: BucketGrid,
    generator: CoordinateGenerator,
    freshness: FreshnessPolicy,
}

impl BucketCache {
    pub fn new(store: Arc<dyn BucketStore>, config: Config) -> Result<Self> {
        config.check()?;
        Ok(Self {
            grid: BucketGrid::new(config.bucket_size_degrees),
            generator: CoordinateGenerator::new(
                config.generation_radius_degrees,
                config.correction,
            ),
            freshness: FreshnessPolicy::new(config.freshness_window()),
            store,
            config,
        })
    }

    /// Cache over a fresh in-memory store with default settings.
    pub fn memory() -> Result<Self> {
        Self::new(Arc::new(MemoryStore::new()), Config::default())
    }

    pub fn builder() -> BucketCacheBuilder {
        BucketCacheBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &BucketGrid {
        &self.grid
    }

    pub fn store(&self) -> &Arc<dyn BucketStore> {
        &self.store
    }

    /// Parse raw, possibly percent-encoded coordinates and look them up.
    ///
    /// Malformed input fails with [`SpawnError::InvalidInput`] before the
    /// store is touched.
    pub async fn lookup_raw(&self, raw_latitude: &str, raw_longitude: &str) -> Result<Lookup> {
        let (latitude, longitude) =
            validation::parse_query(raw_latitude, raw_longitude, self.config.validate_range)?;
        self.lookup(latitude, longitude).await
    }

    pub async fn lookup(&self, latitude: f64, longitude: f64) -> Result<Lookup> {
        self.lookup_at(latitude, longitude, Utc::now()).await
    }

    /// Look up `(latitude, longitude)` as of `now`.
    pub async fn lookup_at(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
    ) -> Result<Lookup> {
        validation::validate_coordinates(latitude, longitude, self.config.validate_range)?;

        let center = self.grid.index(latitude, longitude);
        let neighborhood = bucket::expand(center);

        let fetched = self.fetch_all(&neighborhood).await?;
        let partition = Partition::classify(fetched, &self.freshness, now);

        let regenerated: Vec<BucketRecord> = partition
            .to_regenerate
            .iter()
            .map(|&cell| self.regenerate(cell, now))
            .collect();
        self.persist_all(&regenerated).await?;

        let mut record = BucketRecord::empty(center, now);
        for cell_record in partition.reusable.iter().chain(&regenerated) {
            record.absorb(cell_record);
        }

        let report = LookupReport {
            center,
            reused: partition.reusable.len(),
            stale: partition.stale,
            regenerated: regenerated.len(),
        };
        log::debug!(
            "lookup {}: {} reused, {} regenerated ({} stale)",
            center,
            report.reused,
            report.regenerated,
            report.stale
        );

        Ok(Lookup { record, report })
    }

    /// Flush the underlying store.
    pub async fn sync(&self) -> Result<()> {
        self.store
            .sync()
            .await
            .map_err(|e| SpawnError::upstream("*", StoreOperation::Sync, e))
    }

    /// Fresh contents for `cell`, stamped `now`. Hazards and items come from
    /// separate random streams.
    fn regenerate(&self, cell: BucketCoordinate, now: DateTime<Utc>) -> BucketRecord {
        let center = self.grid.center(cell);
        let count = self.config.points_per_kind;
        let seed = self.config.seed;

        let mut hazard_rng = stream_rng(seed, cell, EntityKind::Hazard, now);
        let mut item_rng = stream_rng(seed, cell, EntityKind::Item, now);
        let hazards = self.generator.generate(&mut hazard_rng, center, count);
        let items = self.generator.generate(&mut item_rng, center, count);

        BucketRecord::new(cell, hazards, items, now)
    }

    async fn fetch_all(
        &self,
        cells: &Neighborhood,
    ) -> Result<Vec<(BucketCoordinate, Option<BucketRecord>)>> {
        stream::iter(cells.iter().copied())
            .map(|cell| async move {
                let key = cell.to_string();
                match self.store.get(&key).await {
                    Ok(record) => Ok((cell, record)),
                    Err(e) => Err(SpawnError::upstream(key, StoreOperation::Get, e)),
                }
            })
            .buffered(self.config.max_concurrency)
            .try_collect()
            .await
    }

    async fn persist_all(&self, records: &[BucketRecord]) -> Result<()> {
        stream::iter(records.iter().map(Ok::<_, SpawnError>))
            .try_for_each_concurrent(self.config.max_concurrency, |record| async move {
                self.store
                    .put(record)
                    .await
                    .map_err(|e| SpawnError::upstream(record.id.as_str(), StoreOperation::Put, e))
            })
            .await
    }
}
