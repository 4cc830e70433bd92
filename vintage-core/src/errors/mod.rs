//! Error taxonomy: one enum per subsystem, plus the umbrella `VintageError`.

mod cache_error;
mod engine_error;
mod sampler_error;
mod solver_error;
mod store_error;
mod validation_error;

pub use cache_error::CacheError;
pub use engine_error::EngineError;
pub use sampler_error::SamplerError;
pub use solver_error::SolverError;
pub use store_error::StoreError;
pub use validation_error::{ValidationError, Violation};

/// Umbrella error for the whole workspace.
#[derive(Debug, thiserror::Error)]
pub enum VintageError {
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Sampler(#[from] SamplerError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Workspace-wide result alias.
pub type VintageResult<T> = Result<T, VintageError>;
