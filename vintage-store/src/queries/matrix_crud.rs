//! Insert and read operations for scenario matrix records.

use rusqlite::{params, Connection, OptionalExtension, Row};

use vintage_core::models::{MatrixPayload, MatrixStatus, ScenarioMatrixRecord};
use vintage_core::VintageResult;

use super::{now_str, parse_ts};
use crate::to_store_err;

/// Insert a `pending` row, or no-op if the key already exists. The unique
/// constraint makes exactly one concurrent caller the creator. Returns
/// whether this call created the row.
pub fn insert_pending(conn: &Connection, matrix_key: &str, fund_id: &str) -> VintageResult<bool> {
    let now = now_str();
    let changed = conn
        .execute(
            "INSERT INTO scenario_matrices (matrix_key, fund_id, status, created_at, updated_at)
             VALUES (?1, ?2, 'pending', ?3, ?3)
             ON CONFLICT(matrix_key) DO NOTHING",
            params![matrix_key, fund_id, now],
        )
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(changed == 1)
}

/// Fetch one record by key.
pub fn get_record(conn: &Connection, matrix_key: &str) -> VintageResult<Option<ScenarioMatrixRecord>> {
    conn.query_row(
        "SELECT matrix_key, fund_id, status, moic_matrix, scenario_states, bucket_params,
                compression_codec, matrix_layout, bucket_count, optimal_scenario_count,
                created_at, updated_at
         FROM scenario_matrices WHERE matrix_key = ?1",
        params![matrix_key],
        map_record,
    )
    .optional()
    .map_err(|e| to_store_err(e.to_string()))
}

pub fn count_by_status(conn: &Connection, status: MatrixStatus) -> VintageResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM scenario_matrices WHERE status = ?1",
        params![status.as_str()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_store_err(e.to_string()))
}

/// Map a row to a record. The payload exists only when every payload
/// column is non-null; the `complete` writer guarantees that atomically.
pub(crate) fn map_record(row: &Row<'_>) -> rusqlite::Result<ScenarioMatrixRecord> {
    let status_str: String = row.get(2)?;
    let status = MatrixStatus::parse(&status_str).unwrap_or(MatrixStatus::Failed);

    let moic_matrix: Option<Vec<u8>> = row.get(3)?;
    let scenario_states: Option<String> = row.get(4)?;
    let bucket_params: Option<String> = row.get(5)?;
    let compression_codec: Option<String> = row.get(6)?;
    let matrix_layout: Option<String> = row.get(7)?;
    let bucket_count: Option<u32> = row.get(8)?;
    let optimal_scenario_count: Option<u32> = row.get(9)?;

    let payload = match (
        moic_matrix,
        scenario_states,
        bucket_params,
        compression_codec,
        matrix_layout,
        bucket_count,
        optimal_scenario_count,
    ) {
        (Some(moic), Some(states), Some(buckets), Some(codec), Some(layout), Some(bc), Some(osc)) => {
            Some(MatrixPayload {
                moic_matrix: moic,
                scenario_states: serde_json::from_str(&states).unwrap_or_default(),
                bucket_params: serde_json::from_str(&buckets).unwrap_or_default(),
                compression_codec: codec,
                matrix_layout: layout,
                bucket_count: bc,
                optimal_scenario_count: osc,
            })
        }
        _ => None,
    };

    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(ScenarioMatrixRecord {
        matrix_key: row.get(0)?,
        fund_id: row.get(1)?,
        status,
        payload,
        created_at: parse_ts(&created_at),
        updated_at: parse_ts(&updated_at),
    })
}
