/// Durable-tier errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("matrix record not found: {matrix_key}")]
    RowNotFound { matrix_key: String },

    #[error("connection lock poisoned: {message}")]
    LockPoisoned { message: String },
}
