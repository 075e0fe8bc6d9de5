//! Request handling shared by every transport

use crate::protocol::{Health, StatusPolicy};
use spawngrid::{BucketCache, BucketRecord, Result};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct Handler {
    cache: Arc<BucketCache>,
    policy: StatusPolicy,
}

impl Handler {
    pub fn new(cache: Arc<BucketCache>, policy: StatusPolicy) -> Self {
        Self { cache, policy }
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Points around raw, still percent-encoded path coordinates.
    pub async fn coordinates(&self, raw_latitude: &str, raw_longitude: &str) -> Result<BucketRecord> {
        match self.cache.lookup_raw(raw_latitude, raw_longitude).await {
            Ok(lookup) => {
                debug!(
                    bucket = %lookup.record.id,
                    reused = lookup.report.reused,
                    regenerated = lookup.report.regenerated,
                    "served coordinates"
                );
                Ok(lookup.record)
            }
            Err(e) if e.is_invalid_input() => {
                warn!("Rejected coordinates {}/{}: {}", raw_latitude, raw_longitude, e);
                Err(e)
            }
            Err(e) => {
                error!("Lookup failed for {}/{}: {}", raw_latitude, raw_longitude, e);
                Err(e)
            }
        }
    }

    pub fn health(&self) -> Health {
        Health::ok()
    }
}
