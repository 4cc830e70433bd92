//! Stale-claim reaper: reverts `processing` rows whose worker went dark.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use vintage_core::constants::STALE_CLAIM_WINDOW_SECS;
use vintage_core::traits::IMatrixStore;
use vintage_core::VintageResult;

/// Periodically invoked (by the surrounding worker runtime) to reclaim
/// claims whose generator died. The store's conditional update guarantees
/// two racing reapers cannot both reclaim a row.
pub struct StaleClaimReaper {
    durable: Arc<dyn IMatrixStore>,
    window: Duration,
}

impl StaleClaimReaper {
    pub fn new(durable: Arc<dyn IMatrixStore>) -> Self {
        Self {
            durable,
            window: Duration::seconds(STALE_CLAIM_WINDOW_SECS),
        }
    }

    /// Override the staleness window (tests use tiny windows).
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Run one reap pass. Returns the reclaimed keys.
    pub fn run(&self) -> VintageResult<Vec<String>> {
        let keys = self.durable.reap_stale(self.window)?;
        if keys.is_empty() {
            info!("reaper pass found no stale claims");
        } else {
            warn!(count = keys.len(), keys = ?keys, "reaper reclaimed stale claims");
        }
        Ok(keys)
    }
}
