//! Execution-plan selection: a pure function of (mode, trial count),
//! separated from the engines so it is testable without running one.

use serde::{Deserialize, Serialize};

use vintage_core::constants::STREAMING_TRIAL_THRESHOLD;
use vintage_core::models::SimulationMode;

/// Which engine a run routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPlan {
    /// Deterministic probability-weighted branch sum.
    Expectation,
    /// Per-trial simulation with materialized trials and exact percentiles.
    Orchestrated,
    /// Batched streaming accumulation; memory independent of trial count.
    Streaming,
}

/// Pick the execution plan for a run.
pub fn select_plan(mode: SimulationMode, num_trials: u32) -> ExecutionPlan {
    match mode {
        SimulationMode::Expectation => ExecutionPlan::Expectation,
        SimulationMode::Stochastic if num_trials >= STREAMING_TRIAL_THRESHOLD => {
            ExecutionPlan::Streaming
        }
        SimulationMode::Stochastic => ExecutionPlan::Orchestrated,
    }
}
