//! Freshness classification of fetched bucket records.

use chrono::{DateTime, TimeDelta, Utc};
use spawngrid_types::bucket::BucketRecord;

/// Outcome of checking a fetched record against the freshness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Missing,
}

impl Freshness {
    /// Stale and missing records are both regenerated from scratch.
    pub fn needs_regeneration(self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    window: TimeDelta,
}

impl FreshnessPolicy {
    pub fn new(window: TimeDelta) -> Self {
        Self { window }
    }

    /// A record is fresh while `now < generated_at + window`.
    pub fn classify(&self, record: Option<&BucketRecord>, now: DateTime<Utc>) -> Freshness {
        match record {
            None => Freshness::Missing,
            Some(record) if now < record.generated_at + self.window => Freshness::Fresh,
            Some(_) => Freshness::Stale,
        }
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(TimeDelta::hours(24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use spawngrid_types::bucket::BucketCoordinate;

    fn record_at(generated_at: DateTime<Utc>) -> BucketRecord {
        BucketRecord::empty(BucketCoordinate::new(0, 0), generated_at)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_missing() {
        let policy = FreshnessPolicy::default();
        let state = policy.classify(None, now());
        assert_eq!(state, Freshness::Missing);
        assert!(state.needs_regeneration());
    }

    #[test]
    fn test_boundary_just_past_window_is_stale() {
        let policy = FreshnessPolicy::default();
        let record = record_at(now() - TimeDelta::hours(24) - TimeDelta::seconds(1));
        assert_eq!(policy.classify(Some(&record), now()), Freshness::Stale);
    }

    #[test]
    fn test_boundary_just_inside_window_is_fresh() {
        let policy = FreshnessPolicy::default();
        let age = TimeDelta::hours(23) + TimeDelta::minutes(59) + TimeDelta::seconds(59);
        let record = record_at(now() - age);
        let state = policy.classify(Some(&record), now());
        assert_eq!(state, Freshness::Fresh);
        assert!(!state.needs_regeneration());
    }

    #[test]
    fn test_exact_window_is_stale() {
        let policy = FreshnessPolicy::default();
        let record = record_at(now() - TimeDelta::hours(24));
        assert_eq!(policy.classify(Some(&record), now()), Freshness::Stale);
    }

    #[test]
    fn test_custom_window() {
        let policy = FreshnessPolicy::new(TimeDelta::minutes(5));
        let record = record_at(now() - TimeDelta::minutes(4));
        assert_eq!(policy.classify(Some(&record), now()), Freshness::Fresh);
        let record = record_at(now() - TimeDelta::minutes(6));
        assert_eq!(policy.classify(Some(&record), now()), Freshness::Stale);
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let policy = FreshnessPolicy::default();
        let record = record_at(now() + TimeDelta::hours(1));
        assert_eq!(policy.classify(Some(&record), now()), Freshness::Fresh);
    }
}
