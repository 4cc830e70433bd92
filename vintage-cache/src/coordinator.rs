//! ScenarioMatrixCache — the two-tier get-or-compute coordinator.
//!
//! Lookup order: ephemeral tier, durable tier, generate. The durable row
//! is the cross-process coordination point: the unique-keyed insert makes
//! exactly one racer the creator, the conditional claim makes exactly one
//! the generator, and everyone else polls the row to a terminal status.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, info, warn};

use vintage_core::constants::EPHEMERAL_TTL_SECS;
use vintage_core::errors::CacheError;
use vintage_core::models::{
    InvalidationCounts, InvalidationScope, MatrixConfig, MatrixStatus, ScenarioMatrixRecord,
};
use vintage_core::traits::{GenerationJob, IEphemeralStore, IJobQueue, IMatrixStore};
use vintage_core::{VintageError, VintageResult};
use vintage_engine::generate_matrix;

use crate::codec::encode_moic_matrix;
use crate::key::matrix_key;

/// How long a claim loser waits for the winner before giving up.
const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Initial poll interval while awaiting a terminal status; doubles up to
/// a 400ms ceiling.
const POLL_INTERVAL: Duration = Duration::from_millis(25);
const POLL_INTERVAL_MAX: Duration = Duration::from_millis(400);

/// Two-tier scenario matrix cache. All collaborators are injected; the
/// coordinator holds no global state.
pub struct ScenarioMatrixCache {
    durable: Arc<dyn IMatrixStore>,
    ephemeral: Arc<dyn IEphemeralStore>,
    queue: Arc<dyn IJobQueue>,
    /// fund_id → matrix keys seen, for fund-scoped ephemeral eviction.
    fund_index: DashMap<String, Vec<String>>,
    wait_timeout: Duration,
}

impl ScenarioMatrixCache {
    pub fn new(
        durable: Arc<dyn IMatrixStore>,
        ephemeral: Arc<dyn IEphemeralStore>,
        queue: Arc<dyn IJobQueue>,
    ) -> Self {
        Self {
            durable,
            ephemeral,
            queue,
            fund_index: DashMap::new(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    /// Override the claim-loser wait deadline (tests use short deadlines).
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Fetch the matrix for a config, generating it exactly once per key
    /// across all concurrent callers.
    pub fn get_or_compute(&self, config: &MatrixConfig) -> VintageResult<ScenarioMatrixRecord> {
        let key = matrix_key(config);

        if let Some(record) = self.ephemeral.get(&key) {
            debug!(matrix_key = %key, "ephemeral hit");
            return Ok(record);
        }

        // Durable tier is the source of truth.
        if let Some(record) = self.durable.get(&key)? {
            match record.status {
                MatrixStatus::Complete => {
                    self.backfill(&key, config, record.clone());
                    return Ok(record);
                }
                MatrixStatus::Failed | MatrixStatus::Invalidated => {
                    // Terminal-but-unusable: a cache miss. Requeue the row
                    // for a fresh generation lifecycle.
                    debug!(matrix_key = %key, status = ?record.status, "terminal row treated as miss");
                    self.durable.requeue_terminal(&key)?;
                }
                MatrixStatus::Pending | MatrixStatus::Processing => {}
            }
        } else {
            self.durable.insert_pending(&key, &config.fund_id)?;
        }

        self.queue.enqueue(GenerationJob {
            matrix_key: key.clone(),
            fund_id: config.fund_id.clone(),
        })?;

        if self.durable.claim_processing(&key)? {
            self.generate_and_complete(&key, config)
        } else {
            self.await_terminal(&key, config)
        }
    }

    /// Invalidate cached matrices in scope. Ephemeral entries are evicted,
    /// durable rows soft-marked.
    pub fn invalidate(&self, scope: &InvalidationScope) -> VintageResult<InvalidationCounts> {
        let ephemeral_evicted = match scope {
            InvalidationScope::All => self.ephemeral.clear(),
            InvalidationScope::Fund(fund_id) => {
                let keys = self
                    .fund_index
                    .get(fund_id)
                    .map(|entry| entry.value().clone())
                    .unwrap_or_default();
                keys.iter().filter(|k| self.ephemeral.delete(k)).count() as u64
            }
            InvalidationScope::Matrix(key) => u64::from(self.ephemeral.delete(key)),
        };
        let durable_marked = self.durable.invalidate(scope)?;
        info!(?scope, ephemeral_evicted, durable_marked, "cache invalidated");
        Ok(InvalidationCounts { ephemeral_evicted, durable_marked })
    }

    /// This claimant won: generate, encode, and complete the row.
    fn generate_and_complete(
        &self,
        key: &str,
        config: &MatrixConfig,
    ) -> VintageResult<ScenarioMatrixRecord> {
        let payload = generate_matrix(config).and_then(|grid| encode_moic_matrix(&grid));
        match payload {
            Ok(payload) => {
                self.durable.complete(key, &payload)?;
                let record = self.durable.get(key)?.ok_or_else(|| {
                    VintageError::Cache(CacheError::GenerationFailed {
                        matrix_key: key.to_string(),
                        reason: "completed row vanished".to_string(),
                    })
                })?;
                self.backfill(key, config, record.clone());
                info!(matrix_key = %key, "matrix generated and completed");
                Ok(record)
            }
            Err(err) => {
                // Leave a visible failed row; never swallow the cause.
                warn!(matrix_key = %key, error = %err, "matrix generation failed");
                self.durable.fail(key)?;
                Err(VintageError::Cache(CacheError::GenerationFailed {
                    matrix_key: key.to_string(),
                    reason: err.to_string(),
                }))
            }
        }
    }

    /// A claim loser polls the durable row until the winner lands a
    /// terminal status.
    fn await_terminal(
        &self,
        key: &str,
        config: &MatrixConfig,
    ) -> VintageResult<ScenarioMatrixRecord> {
        let deadline = Instant::now() + self.wait_timeout;
        let mut interval = POLL_INTERVAL;
        loop {
            if let Some(record) = self.durable.get(key)? {
                if record.status == MatrixStatus::Complete {
                    self.backfill(key, config, record.clone());
                    return Ok(record);
                }
                if record.status.is_terminal() {
                    // The winner failed; surface the row as-is. Retry
                    // policy belongs to the external queue.
                    return Ok(record);
                }
            }
            if Instant::now() >= deadline {
                return Err(VintageError::Cache(CacheError::Timeout {
                    matrix_key: key.to_string(),
                    waited_ms: self.wait_timeout.as_millis() as u64,
                }));
            }
            std::thread::sleep(interval);
            interval = (interval * 2).min(POLL_INTERVAL_MAX);
        }
    }

    /// Write a complete record through to the ephemeral tier and remember
    /// its key for fund-scoped eviction.
    fn backfill(&self, key: &str, config: &MatrixConfig, record: ScenarioMatrixRecord) {
        self.ephemeral
            .set(key, record, Duration::from_secs(EPHEMERAL_TTL_SECS));
        let mut keys = self.fund_index.entry(config.fund_id.clone()).or_default();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
}
