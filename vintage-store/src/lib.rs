//! # vintage-store
//!
//! SQLite persistence for scenario matrix records. Single write connection
//! behind a mutex, round-robin read pool, WAL mode, versioned migrations,
//! and the optimistic status transitions the cache tier's claim/complete
//! protocol relies on.

mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::MatrixStore;

use vintage_core::errors::StoreError;
use vintage_core::VintageError;

/// Shorthand used across the query modules.
pub(crate) fn to_store_err(message: String) -> VintageError {
    VintageError::Store(StoreError::Sqlite { message })
}
