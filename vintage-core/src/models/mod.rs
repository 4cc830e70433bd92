//! Data model: cash flows, market parameters, simulation configuration,
//! metric distributions, and scenario matrix records.

mod cashflow;
mod config;
mod distribution;
mod market;
mod matrix;

pub use cashflow::{distributed, has_both_signs, paid_in, CashFlow};
pub use config::{PortfolioShape, SimulationConfig, SimulationMode};
pub use distribution::{MetricDistribution, MetricType, Percentiles, SummaryStatistics};
pub use market::{MarketParameters, StageTransition};
pub use matrix::{
    BucketDefinition, InvalidationCounts, InvalidationScope, MatrixConfig, MatrixPayload,
    MatrixStatus, ScenarioMatrixRecord,
};
