//! # vintage-core
//!
//! Foundation crate for the Vintage fund-modeling system.
//! Defines all types, traits, errors, and constants.
//! Every other crate in the workspace depends on this.

pub mod constants;
pub mod errors;
pub mod models;
pub mod presets;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use errors::{VintageError, VintageResult};
pub use models::{
    CashFlow, MarketParameters, MatrixConfig, MatrixPayload, MatrixStatus, MetricDistribution,
    MetricType, ScenarioMatrixRecord, SimulationConfig, SimulationMode,
};
