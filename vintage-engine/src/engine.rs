//! SimulationEngine — the public entry point. Validates the config,
//! selects an execution plan, runs it, and gates every produced
//! distribution through the validator before anything is returned.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use vintage_core::models::{MetricDistribution, SimulationConfig, SimulationMode};
use vintage_core::VintageResult;
use vintage_validation::DistributionValidator;

use crate::expectation::run_expectation;
use crate::selector::{select_plan, ExecutionPlan};
use crate::stochastic::run_orchestrated;
use crate::streaming::run_streaming;

/// How a completed run was executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub trials_run: u32,
    pub mode: SimulationMode,
    pub plan: ExecutionPlan,
    /// The seed actually used (reported even when drawn from entropy, so
    /// any stochastic run can be replayed). `None` for expectation runs.
    pub seed: Option<u64>,
    pub elapsed_ms: u64,
}

/// A validated simulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub distributions: Vec<MetricDistribution>,
    pub metadata: RunMetadata,
}

/// The Monte Carlo simulation engine.
pub struct SimulationEngine {
    validator: DistributionValidator,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self { validator: DistributionValidator::new() }
    }

    /// Run a simulation. Fails fast on a malformed config; a validation
    /// failure on the produced distributions is a hard error, never
    /// silently clamped.
    pub fn run(&self, config: &SimulationConfig) -> VintageResult<SimulationOutput> {
        config.validate()?;

        let plan = select_plan(config.mode, config.num_trials);
        let start = Instant::now();

        let (distributions, seed) = match plan {
            ExecutionPlan::Expectation => (run_expectation(config)?, None),
            ExecutionPlan::Orchestrated => {
                let seed = resolve_seed(config);
                (run_orchestrated(config, seed)?, Some(seed))
            }
            ExecutionPlan::Streaming => {
                let seed = resolve_seed(config);
                (run_streaming(config, seed)?, Some(seed))
            }
        };

        self.validator.validate_all(&distributions)?;

        let metadata = RunMetadata {
            trials_run: match plan {
                ExecutionPlan::Expectation => 0,
                _ => config.num_trials,
            },
            mode: config.mode,
            plan,
            seed,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            fund_id = %config.fund_id,
            plan = ?plan,
            trials = metadata.trials_run,
            elapsed_ms = metadata.elapsed_ms,
            "simulation complete"
        );

        Ok(SimulationOutput { distributions, metadata })
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_seed(config: &SimulationConfig) -> u64 {
    config.random_seed.unwrap_or_else(rand::random)
}
