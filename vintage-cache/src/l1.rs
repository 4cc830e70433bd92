//! Ephemeral tier backed by moka.
//!
//! Stores complete records only. Entries carry their own expiry on top of
//! the cache-level ceiling, so per-set TTLs shorter than the ceiling are
//! honored exactly.

use std::time::{Duration, Instant};

use moka::sync::Cache;

use vintage_core::constants::EPHEMERAL_TTL_SECS;
use vintage_core::models::ScenarioMatrixRecord;
use vintage_core::traits::IEphemeralStore;

/// Moka-backed ephemeral tier.
pub struct MokaTier {
    cache: Cache<String, (ScenarioMatrixRecord, Instant)>,
}

impl MokaTier {
    /// Create a tier with the given max entry count. The cache-level TTL is
    /// the workspace default ceiling.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(EPHEMERAL_TTL_SECS))
            .build();
        Self { cache }
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IEphemeralStore for MokaTier {
    fn get(&self, matrix_key: &str) -> Option<ScenarioMatrixRecord> {
        let (record, expires_at) = self.cache.get(matrix_key)?;
        if Instant::now() < expires_at {
            Some(record)
        } else {
            self.cache.invalidate(matrix_key);
            None
        }
    }

    fn set(&self, matrix_key: &str, record: ScenarioMatrixRecord, ttl: Duration) {
        self.cache
            .insert(matrix_key.to_string(), (record, Instant::now() + ttl));
    }

    fn delete(&self, matrix_key: &str) -> bool {
        let present = self.cache.get(matrix_key).is_some();
        self.cache.invalidate(matrix_key);
        present
    }

    fn clear(&self) -> u64 {
        self.cache.run_pending_tasks();
        let count = self.cache.entry_count();
        self.cache.invalidate_all();
        count
    }
}
