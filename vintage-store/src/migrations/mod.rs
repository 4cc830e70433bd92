//! Versioned schema migrations, applied in order on startup.

mod v001_scenario_matrices;

use rusqlite::Connection;

use vintage_core::errors::StoreError;
use vintage_core::{VintageError, VintageResult};

use crate::to_store_err;

/// Migrations in version order.
const MIGRATIONS: &[(u32, fn(&Connection) -> VintageResult<()>)] =
    &[(1, v001_scenario_matrices::migrate)];

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> VintageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_store_err(e.to_string()))?;

    let current: u32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| row.get(0))
        .map_err(|e| to_store_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| {
            VintageError::Store(StoreError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
            .map_err(|e| to_store_err(e.to_string()))?;
        tracing::info!(version, "applied migration");
    }
    Ok(())
}
