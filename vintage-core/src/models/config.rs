use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::MarketParameters;

/// Simulation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Deterministic probability-weighted branch sum. No RNG.
    Expectation,
    /// Per-trial stochastic simulation.
    Stochastic,
}

/// The modeled fund's deployment shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioShape {
    pub company_count: u32,
    /// Initial check size per company.
    pub initial_check: f64,
    /// Follow-on check size written at graduations.
    pub follow_on_check: f64,
}

/// Full configuration for a simulation run. Immutable once a run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub fund_id: String,
    pub num_trials: u32,
    pub time_horizon_years: u32,
    /// Explicit seed for reproducible stochastic runs. `None` draws a seed
    /// from entropy; the drawn seed is reported in run metadata.
    pub random_seed: Option<u64>,
    pub mode: SimulationMode,
    /// Fund inception date: trial cash flows are dated relative to this.
    pub inception: NaiveDate,
    pub portfolio: PortfolioShape,
    pub market: MarketParameters,
}

impl SimulationConfig {
    /// Fail-fast validation; a malformed config never starts a partial run.
    pub fn validate(&self) -> Result<(), EngineError> {
        let reject = |reason: String| Err(EngineError::InvalidConfig { reason });

        if self.fund_id.is_empty() {
            return reject("fund_id must not be empty".to_string());
        }
        if self.mode == SimulationMode::Stochastic && self.num_trials == 0 {
            return reject("num_trials must be positive for stochastic runs".to_string());
        }
        if self.time_horizon_years == 0 {
            return reject("time_horizon_years must be positive".to_string());
        }
        if self.portfolio.company_count == 0 {
            return reject("portfolio.company_count must be positive".to_string());
        }
        if !(self.portfolio.initial_check > 0.0) {
            return reject(format!(
                "portfolio.initial_check must be positive, got {}",
                self.portfolio.initial_check
            ));
        }
        if self.portfolio.follow_on_check < 0.0 {
            return reject(format!(
                "portfolio.follow_on_check must be non-negative, got {}",
                self.portfolio.follow_on_check
            ));
        }
        self.market.validate()
    }
}
