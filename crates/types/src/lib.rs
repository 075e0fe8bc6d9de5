//! # spawngrid-types
//!
//! Core data types for the spawngrid bucket cache.
//!
//! - **Geography**: [`GeoPoint`](geo::GeoPoint), a `[lat, lon]` pair
//! - **Buckets**: [`BucketCoordinate`](bucket::BucketCoordinate) cells and the
//!   [`BucketRecord`](bucket::BucketRecord) cached per cell
//! - **Config**: grid constants and the [`LongitudeCorrection`](config::LongitudeCorrection) strategy
//!
//! All types are serializable with Serde; records use the same field names
//! in the store and in HTTP responses.
//!
//! ## Examples
//!
//! ```rust
//! use spawngrid_types::bucket::{BucketCoordinate, BucketRecord};
//! use spawngrid_types::geo::GeoPoint;
//! use chrono::Utc;
//!
//! let cell = BucketCoordinate::new(2, -5);
//! let record = BucketRecord::new(cell, vec![GeoPoint::new(0.03, -0.07)], vec![], Utc::now());
//! assert_eq!(record.id, "2:-5");
//! ```

pub mod bucket;
pub mod config;
pub mod geo;
