//! Grid-bucketed cache of randomly generated map entities.
//!
//! The world is cut into square cells of [`RADIUS_IN_DEGREES`] degrees. A
//! lookup maps a coordinate to its cell, takes the 3×3 block around it, and
//! returns every hazard and item point in those nine cells. Each cell's
//! points are generated once, stored, and reused for 24 hours.
//!
//! ## Features
//! - **Deterministic partitioning**: the same coordinate always lands in the same cell
//! - **Freshness**: cells older than the window are regenerated and overwritten
//! - **Pluggable storage**: any [`BucketStore`] backend, in-memory or snapshot-backed
//! - **Bounded fan-out**: store reads and writes run concurrently up to a configured limit
//!
//! ```rust
//! use spawngrid::BucketCache;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let cache = BucketCache::memory()?;
//!
//! let lookup = cache.lookup(37.7749, -122.4194).await?;
//! assert_eq!(lookup.record.id, "2777:-9002");
//! assert_eq!(lookup.record.hazards.len(), 45);
//!
//! // Raw, possibly percent-encoded input is validated before any store access
//! assert!(cache.lookup_raw("abc", "1.0").await.is_err());
//! # Ok::<(), spawngrid::SpawnError>(())
//! # }).unwrap();
//! ```

pub mod builder;
pub mod cache;
pub mod compute;
pub mod config;
pub mod error;
pub mod storage;

pub use builder::BucketCacheBuilder;
pub use cache::{BucketCache, Lookup, LookupReport};
pub use error::{Result, SpawnError, StoreOperation};

pub use config::{
    Config, FRESHNESS_WINDOW_SECS, GENERATION_RADIUS_IN_DEGREES, LongitudeCorrection,
    POINTS_PER_KIND, RADIUS_IN_DEGREES, SnapshotConfig,
};

pub use spawngrid_types::bucket::{BucketCoordinate, BucketRecord};
pub use spawngrid_types::geo::GeoPoint;

pub use compute::bucket::{BucketGrid, Neighborhood};
pub use compute::freshness::{Freshness, FreshnessPolicy};
pub use compute::generator::{CoordinateGenerator, EntityKind};
pub use compute::validation;

pub use storage::{BucketStore, MemoryStore, StoreStats};

#[cfg(feature = "snapshot")]
pub use storage::{SnapshotFile, SnapshotStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{BucketCache, BucketCacheBuilder, Lookup, LookupReport, Result, SpawnError};

    pub use crate::{BucketCoordinate, BucketRecord, GeoPoint};

    pub use crate::{Config, LongitudeCorrection};

    pub use crate::{BucketStore, MemoryStore};

    #[cfg(feature = "snapshot")]
    pub use crate::SnapshotStore;
}
