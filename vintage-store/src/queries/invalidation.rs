//! Scoped soft invalidation. Rows are marked, never deleted — the audit
//! trail survives.

use rusqlite::{params, Connection};

use vintage_core::models::InvalidationScope;
use vintage_core::VintageResult;

use super::now_str;
use crate::to_store_err;

/// Soft-mark rows in scope as `invalidated`. Returns the number marked.
pub fn invalidate(conn: &Connection, scope: &InvalidationScope) -> VintageResult<u64> {
    let now = now_str();
    let changed = match scope {
        InvalidationScope::All => conn.execute(
            "UPDATE scenario_matrices SET status = 'invalidated', updated_at = ?1
             WHERE status != 'invalidated'",
            params![now],
        ),
        InvalidationScope::Fund(fund_id) => conn.execute(
            "UPDATE scenario_matrices SET status = 'invalidated', updated_at = ?1
             WHERE fund_id = ?2 AND status != 'invalidated'",
            params![now, fund_id],
        ),
        InvalidationScope::Matrix(matrix_key) => conn.execute(
            "UPDATE scenario_matrices SET status = 'invalidated', updated_at = ?1
             WHERE matrix_key = ?2 AND status != 'invalidated'",
            params![now, matrix_key],
        ),
    }
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(changed as u64)
}
