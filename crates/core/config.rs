//! Configuration for the bucket cache.
//!
//! Grid constants and the correction strategy are re-exported from the
//! `spawngrid-types` crate for convenience.
use crate::error::{Result, SpawnError};
use chrono::TimeDelta;
use serde::de::Error;

pub use spawngrid_types::config::{
    FRESHNESS_WINDOW_SECS, GENERATION_RADIUS_IN_DEGREES, LongitudeCorrection, POINTS_PER_KIND,
    RADIUS_IN_DEGREES,
};

/// Freshness windows longer than this are rejected by [`Config::validate`].
const MAX_FRESHNESS_WINDOW_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Bucket cache configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Grid cell side in degrees
    #[serde(default = "Config::default_bucket_size")]
    pub bucket_size_degrees: f64,

    /// Radius around a cell's nominal center that points are drawn within
    #[serde(default = "Config::default_generation_radius")]
    pub generation_radius_degrees: f64,

    /// Points generated per entity kind for each bucket
    #[serde(default = "Config::default_points_per_kind")]
    pub points_per_kind: usize,

    #[serde(default = "Config::default_freshness_window_secs")]
    pub freshness_window_secs: u64,

    /// Upper bound on in-flight store calls per request
    #[serde(default = "Config::default_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default)]
    pub correction: LongitudeCorrection,

    /// Reject latitudes outside [-90, 90] and longitudes outside [-180, 180]
    #[serde(default = "Config::default_validate_range")]
    pub validate_range: bool,

    /// Seed for reproducible generation; OS entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Snapshot persistence settings
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Write a snapshot after this many puts; only on explicit sync when unset
    #[serde(default)]
    pub auto_snapshot_puts: Option<usize>,
}

impl Config {
    const fn default_bucket_size() -> f64 {
        RADIUS_IN_DEGREES
    }

    const fn default_generation_radius() -> f64 {
        GENERATION_RADIUS_IN_DEGREES
    }

    const fn default_points_per_kind() -> usize {
        POINTS_PER_KIND
    }

    const fn default_freshness_window_secs() -> u64 {
        FRESHNESS_WINDOW_SECS
    }

    const fn default_max_concurrency() -> usize {
        9
    }

    const fn default_validate_range() -> bool {
        true
    }

    pub fn with_points_per_kind(mut self, count: usize) -> Self {
        assert!(count > 0, "Points per kind must be greater than zero");

        if count > 10_000 {
            log::warn!(
                "{} points per kind is very large; every regenerated bucket stores {} points",
                count,
                count * 2
            );
        }

        self.points_per_kind = count;
        self
    }

    pub fn with_freshness_window_secs(mut self, secs: u64) -> Self {
        assert!(secs > 0, "Freshness window must be greater than zero");
        self.freshness_window_secs = secs;
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        assert!(limit > 0, "Concurrency limit must be greater than zero");
        self.max_concurrency = limit;
        self
    }

    pub fn with_correction(mut self, correction: LongitudeCorrection) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_validate_range(mut self, enabled: bool) -> Self {
        self.validate_range = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_snapshot_auto_puts(mut self, puts: usize) -> Self {
        assert!(puts > 0, "Snapshot interval must be greater than zero");
        self.snapshot.auto_snapshot_puts = Some(puts);
        self
    }

    /// The freshness window as a chrono duration.
    pub fn freshness_window(&self) -> TimeDelta {
        TimeDelta::seconds(self.freshness_window_secs.min(MAX_FRESHNESS_WINDOW_SECS) as i64)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.bucket_size_degrees.is_finite() && self.bucket_size_degrees > 0.0) {
            return Err(format!(
                "Bucket size must be a positive number of degrees, got {}",
                self.bucket_size_degrees
            ));
        }

        if !(self.generation_radius_degrees.is_finite() && self.generation_radius_degrees > 0.0) {
            return Err(format!(
                "Generation radius must be a positive number of degrees, got {}",
                self.generation_radius_degrees
            ));
        }

        if self.generation_radius_degrees > self.bucket_size_degrees {
            return Err(format!(
                "Generation radius {} exceeds bucket size {}",
                self.generation_radius_degrees, self.bucket_size_degrees
            ));
        }

        if self.points_per_kind == 0 {
            return Err("Points per kind must be greater than zero".to_string());
        }

        if self.freshness_window_secs == 0 {
            return Err("Freshness window must be greater than zero".to_string());
        }

        if self.freshness_window_secs > MAX_FRESHNESS_WINDOW_SECS {
            return Err(format!(
                "Freshness window must not exceed {} seconds",
                MAX_FRESHNESS_WINDOW_SECS
            ));
        }

        if self.max_concurrency == 0 {
            return Err("Concurrency limit must be greater than zero".to_string());
        }

        if self.snapshot.auto_snapshot_puts == Some(0) {
            return Err("Snapshot interval must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Validate, converting the message into a [`SpawnError::Config`].
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(SpawnError::Config)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_size_degrees: Self::default_bucket_size(),
            generation_radius_degrees: Self::default_generation_radius(),
            points_per_kind: Self::default_points_per_kind(),
            freshness_window_secs: Self::default_freshness_window_secs(),
            max_concurrency: Self::default_max_concurrency(),
            correction: LongitudeCorrection::default(),
            validate_range: Self::default_validate_range(),
            seed: None,
            snapshot: SnapshotConfig::default(),
        }
    }
}
