use chrono::Duration;

use crate::errors::VintageResult;
use crate::models::{InvalidationScope, MatrixPayload, MatrixStatus, ScenarioMatrixRecord};

/// Durable tier for scenario matrix records. The single source of truth:
/// the ephemeral tier is never trusted on conflict.
pub trait IMatrixStore: Send + Sync {
    /// Insert a `pending` row for the key, or no-op if a row already exists
    /// (the unique key makes exactly one concurrent caller the creator).
    /// Returns whether this call created the row.
    fn insert_pending(&self, matrix_key: &str, fund_id: &str) -> VintageResult<bool>;

    fn get(&self, matrix_key: &str) -> VintageResult<Option<ScenarioMatrixRecord>>;

    /// Optimistic `pending → processing` transition. Returns whether this
    /// caller won the claim.
    fn claim_processing(&self, matrix_key: &str) -> VintageResult<bool>;

    /// Write ALL payload fields plus `status = complete` atomically in one
    /// transaction. Readers never observe `complete` with a missing field.
    fn complete(&self, matrix_key: &str, payload: &MatrixPayload) -> VintageResult<()>;

    /// Mark the row `failed`. No payload is written; the row stays visible
    /// for audit and is treated as a cache miss by readers.
    fn fail(&self, matrix_key: &str) -> VintageResult<()>;

    /// Revert `processing` rows stale past `window` back to `pending` via a
    /// status-conditional update. Two racing reapers cannot both reclaim the
    /// same row. Returns the reclaimed keys.
    fn reap_stale(&self, window: Duration) -> VintageResult<Vec<String>>;

    /// Conditional `failed | invalidated → pending` so a terminal row can
    /// be regenerated. Clears any retained payload. Returns whether the
    /// row was requeued.
    fn requeue_terminal(&self, matrix_key: &str) -> VintageResult<bool>;

    /// Soft-mark rows in scope as `invalidated` (no hard delete). Returns
    /// the number of rows marked.
    fn invalidate(&self, scope: &InvalidationScope) -> VintageResult<u64>;

    fn count_by_status(&self, status: MatrixStatus) -> VintageResult<u64>;
}
