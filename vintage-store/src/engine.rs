//! MatrixStore — owns the ConnectionPool and implements IMatrixStore.

use std::path::Path;

use chrono::Duration;
use tracing::{debug, info};

use vintage_core::models::{InvalidationScope, MatrixPayload, MatrixStatus, ScenarioMatrixRecord};
use vintage_core::traits::IMatrixStore;
use vintage_core::VintageResult;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

/// The durable tier. Owns the connection pool and provides the full
/// IMatrixStore interface.
pub struct MatrixStore {
    pool: ConnectionPool,
}

impl MatrixStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> VintageResult<Self> {
        let pool = ConnectionPool::open(path, 4)?;
        let store = Self { pool };
        store.initialize()?;
        info!(path = %path.display(), "matrix store opened");
        Ok(store)
    }

    /// Open an in-memory store (for testing). Reads route through the
    /// writer since in-memory read connections would be isolated databases.
    pub fn open_in_memory() -> VintageResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> VintageResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> VintageResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> VintageResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn_sync(f),
        }
    }
}

impl IMatrixStore for MatrixStore {
    fn insert_pending(&self, matrix_key: &str, fund_id: &str) -> VintageResult<bool> {
        self.pool.writer.with_conn_sync(|conn| {
            let created = queries::matrix_crud::insert_pending(conn, matrix_key, fund_id)?;
            if created {
                debug!(matrix_key, fund_id, "inserted pending matrix row");
            }
            Ok(created)
        })
    }

    fn get(&self, matrix_key: &str) -> VintageResult<Option<ScenarioMatrixRecord>> {
        self.with_reader(|conn| queries::matrix_crud::get_record(conn, matrix_key))
    }

    fn claim_processing(&self, matrix_key: &str) -> VintageResult<bool> {
        self.pool.writer.with_conn_sync(|conn| {
            let won = queries::claim::claim_processing(conn, matrix_key)?;
            debug!(matrix_key, won, "claim attempt");
            Ok(won)
        })
    }

    fn complete(&self, matrix_key: &str, payload: &MatrixPayload) -> VintageResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::claim::complete(conn, matrix_key, payload)?;
            debug!(matrix_key, bytes = payload.moic_matrix.len(), "matrix completed");
            Ok(())
        })
    }

    fn fail(&self, matrix_key: &str) -> VintageResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::claim::fail(conn, matrix_key))
    }

    fn requeue_terminal(&self, matrix_key: &str) -> VintageResult<bool> {
        self.pool.writer.with_conn_sync(|conn| {
            let requeued = queries::claim::requeue_terminal(conn, matrix_key)?;
            if requeued {
                debug!(matrix_key, "requeued terminal row for regeneration");
            }
            Ok(requeued)
        })
    }

    fn reap_stale(&self, window: Duration) -> VintageResult<Vec<String>> {
        self.pool.writer.with_conn_sync(|conn| {
            let keys = queries::claim::reap_stale(conn, window)?;
            if !keys.is_empty() {
                info!(count = keys.len(), "reaped stale processing claims");
            }
            Ok(keys)
        })
    }

    fn invalidate(&self, scope: &InvalidationScope) -> VintageResult<u64> {
        self.pool.writer.with_conn_sync(|conn| {
            let marked = queries::invalidation::invalidate(conn, scope)?;
            info!(?scope, marked, "invalidated durable matrix rows");
            Ok(marked)
        })
    }

    fn count_by_status(&self, status: MatrixStatus) -> VintageResult<u64> {
        self.with_reader(|conn| queries::matrix_crud::count_by_status(conn, status))
    }
}
