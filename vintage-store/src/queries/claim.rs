//! Optimistic status transitions: claim, complete, fail, reap.
//!
//! Every transition is a single conditional UPDATE. The row's current
//! status is part of the WHERE clause, so two racers cannot both win —
//! SQLite reports exactly one changed row.

use chrono::Duration;
use rusqlite::{params, Connection};

use vintage_core::errors::StoreError;
use vintage_core::models::MatrixPayload;
use vintage_core::{VintageError, VintageResult};

use super::{format_ts, now_str};
use crate::to_store_err;

/// `pending → processing`. Returns whether this caller won the claim.
pub fn claim_processing(conn: &Connection, matrix_key: &str) -> VintageResult<bool> {
    let changed = conn
        .execute(
            "UPDATE scenario_matrices SET status = 'processing', updated_at = ?2
             WHERE matrix_key = ?1 AND status = 'pending'",
            params![matrix_key, now_str()],
        )
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(changed == 1)
}

/// `processing → complete`, writing every payload column in the same
/// statement. A reader can never observe `complete` with a null payload
/// field.
pub fn complete(conn: &Connection, matrix_key: &str, payload: &MatrixPayload) -> VintageResult<()> {
    let scenario_states = serde_json::to_string(&payload.scenario_states)
        .map_err(|e| to_store_err(e.to_string()))?;
    let bucket_params = serde_json::to_string(&payload.bucket_params)
        .map_err(|e| to_store_err(e.to_string()))?;

    let changed = conn
        .execute(
            "UPDATE scenario_matrices SET
                status = 'complete',
                moic_matrix = ?2,
                scenario_states = ?3,
                bucket_params = ?4,
                compression_codec = ?5,
                matrix_layout = ?6,
                bucket_count = ?7,
                optimal_scenario_count = ?8,
                updated_at = ?9
             WHERE matrix_key = ?1 AND status = 'processing'",
            params![
                matrix_key,
                payload.moic_matrix,
                scenario_states,
                bucket_params,
                payload.compression_codec,
                payload.matrix_layout,
                payload.bucket_count,
                payload.optimal_scenario_count,
                now_str(),
            ],
        )
        .map_err(|e| to_store_err(e.to_string()))?;

    if changed == 1 {
        Ok(())
    } else {
        Err(VintageError::Store(StoreError::RowNotFound {
            matrix_key: matrix_key.to_string(),
        }))
    }
}

/// `processing → failed`. No payload columns are written; the row stays
/// visible for audit.
pub fn fail(conn: &Connection, matrix_key: &str) -> VintageResult<()> {
    let changed = conn
        .execute(
            "UPDATE scenario_matrices SET status = 'failed', updated_at = ?2
             WHERE matrix_key = ?1 AND status = 'processing'",
            params![matrix_key, now_str()],
        )
        .map_err(|e| to_store_err(e.to_string()))?;

    if changed == 1 {
        Ok(())
    } else {
        Err(VintageError::Store(StoreError::RowNotFound {
            matrix_key: matrix_key.to_string(),
        }))
    }
}

/// `failed | invalidated → pending` for regeneration. Any retained payload
/// is cleared so the row re-enters the lifecycle clean.
pub fn requeue_terminal(conn: &Connection, matrix_key: &str) -> VintageResult<bool> {
    let changed = conn
        .execute(
            "UPDATE scenario_matrices SET
                status = 'pending',
                moic_matrix = NULL,
                scenario_states = NULL,
                bucket_params = NULL,
                compression_codec = NULL,
                matrix_layout = NULL,
                bucket_count = NULL,
                optimal_scenario_count = NULL,
                updated_at = ?2
             WHERE matrix_key = ?1 AND status IN ('failed', 'invalidated')",
            params![matrix_key, now_str()],
        )
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(changed == 1)
}

/// Revert `processing` rows stale past `window` back to `pending`. The
/// cutoff sits in the WHERE clause, so a row reverted by one reaper no
/// longer matches for the other. Returns the reclaimed keys.
pub fn reap_stale(conn: &Connection, window: Duration) -> VintageResult<Vec<String>> {
    let cutoff = format_ts(chrono::Utc::now() - window);
    let mut stmt = conn
        .prepare(
            "UPDATE scenario_matrices SET status = 'pending', updated_at = ?2
             WHERE status = 'processing' AND updated_at < ?1
             RETURNING matrix_key",
        )
        .map_err(|e| to_store_err(e.to_string()))?;
    let keys = stmt
        .query_map(params![cutoff, now_str()], |row| row.get::<_, String>(0))
        .map_err(|e| to_store_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(keys)
}
