use std::time::Duration;

use crate::models::ScenarioMatrixRecord;

/// Ephemeral key-value tier. A pure performance cache: entries expire via
/// TTL and the tier may drop entries at any time.
pub trait IEphemeralStore: Send + Sync {
    fn get(&self, matrix_key: &str) -> Option<ScenarioMatrixRecord>;

    fn set(&self, matrix_key: &str, record: ScenarioMatrixRecord, ttl: Duration);

    /// Remove one entry. Returns whether it was present.
    fn delete(&self, matrix_key: &str) -> bool;

    /// Drop every entry. Returns the entry count prior to clearing.
    fn clear(&self) -> u64;
}
