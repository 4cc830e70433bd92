use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Per-stage annual graduation probability. A company that graduates out of
/// the last configured stage exits the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub stage: String,
    /// Annual probability of advancing to the next stage, in [0, 1].
    pub graduate: f64,
}

/// Market assumptions for a simulation run. Immutable once a run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketParameters {
    /// Median simulated exit multiple (power-law calibration point).
    pub exit_multiple_median: f64,
    /// 90th-percentile simulated exit multiple (power-law calibration point).
    pub exit_multiple_p90: f64,
    /// Annual probability that a company fails outright, in [0, 1].
    pub failure_rate: f64,
    /// Probability a follow-on check is written at each graduation, in [0, 1].
    pub follow_on_probability: f64,
    /// Expected hold period in years; must be positive.
    pub hold_period_years: f64,
    /// Stage ladder. Must be non-empty; each stage's graduate + failure_rate
    /// must leave non-negative remain mass.
    pub stage_transitions: Vec<StageTransition>,
}

impl MarketParameters {
    /// Fail-fast validation. Malformed parameters are rejected before any
    /// simulation work begins.
    pub fn validate(&self) -> Result<(), EngineError> {
        let reject = |reason: String| Err(EngineError::InvalidConfig { reason });

        if !(self.exit_multiple_median > 0.0) || !self.exit_multiple_median.is_finite() {
            return reject(format!(
                "exit_multiple_median must be positive and finite, got {}",
                self.exit_multiple_median
            ));
        }
        if !(self.exit_multiple_p90 > self.exit_multiple_median) {
            return reject(format!(
                "exit_multiple_p90 ({}) must exceed exit_multiple_median ({})",
                self.exit_multiple_p90, self.exit_multiple_median
            ));
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return reject(format!("failure_rate must be in [0, 1], got {}", self.failure_rate));
        }
        if !(0.0..=1.0).contains(&self.follow_on_probability) {
            return reject(format!(
                "follow_on_probability must be in [0, 1], got {}",
                self.follow_on_probability
            ));
        }
        if !(self.hold_period_years > 0.0) || !self.hold_period_years.is_finite() {
            return reject(format!(
                "hold_period_years must be positive and finite, got {}",
                self.hold_period_years
            ));
        }
        if self.stage_transitions.is_empty() {
            return reject("stage_transitions must not be empty".to_string());
        }
        for t in &self.stage_transitions {
            if !(0.0..=1.0).contains(&t.graduate) {
                return reject(format!(
                    "stage '{}' graduate probability must be in [0, 1], got {}",
                    t.stage, t.graduate
                ));
            }
            if t.graduate + self.failure_rate > 1.0 {
                return reject(format!(
                    "stage '{}': graduate ({}) + failure_rate ({}) exceeds 1",
                    t.stage, t.graduate, self.failure_rate
                ));
            }
        }
        Ok(())
    }
}
