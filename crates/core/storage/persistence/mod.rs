//! Persistence formats for bucket stores.
//!
//! - `SnapshotFile`: point-in-time snapshot of every bucket record

pub mod snapshot;

pub use snapshot::SnapshotFile;
