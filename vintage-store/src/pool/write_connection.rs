//! The single write connection, serialized behind a mutex.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use vintage_core::errors::StoreError;
use vintage_core::{VintageError, VintageResult};

use super::pragmas::apply_pragmas;
use crate::to_store_err;

/// Owns the one connection allowed to write. WAL mode lets readers proceed
/// while a write is in flight.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> VintageResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_store_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> VintageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_store_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Execute a closure on the write connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> VintageResult<T>
    where
        F: FnOnce(&Connection) -> VintageResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| {
            VintageError::Store(StoreError::LockPoisoned { message: e.to_string() })
        })?;
        f(&guard)
    }
}
