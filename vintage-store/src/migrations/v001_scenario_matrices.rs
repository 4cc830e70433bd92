//! v001: scenario_matrices table with status and fund indexes.

use rusqlite::Connection;

use vintage_core::VintageResult;

use crate::to_store_err;

pub fn migrate(conn: &Connection) -> VintageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS scenario_matrices (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            matrix_key              TEXT NOT NULL UNIQUE,
            fund_id                 TEXT NOT NULL,
            status                  TEXT NOT NULL DEFAULT 'pending',
            moic_matrix             BLOB,
            scenario_states         TEXT,
            bucket_params           TEXT,
            compression_codec       TEXT,
            matrix_layout           TEXT,
            bucket_count            INTEGER,
            optimal_scenario_count  INTEGER,
            created_at              TEXT NOT NULL,
            updated_at              TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_matrices_status ON scenario_matrices(status);
        CREATE INDEX IF NOT EXISTS idx_matrices_fund ON scenario_matrices(fund_id);
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}
