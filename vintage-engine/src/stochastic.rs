//! Orchestrated stochastic engine: materializes every trial outcome and
//! reports exact sorted-sample percentiles. The right plan for mid-size
//! runs; large runs route to the streaming engine instead.

use rayon::prelude::*;

use vintage_core::models::{MetricDistribution, MetricType, SimulationConfig};
use vintage_core::VintageResult;

use crate::accumulator::{exact_percentiles, MetricAccumulator};
use crate::sampler::PowerLawExit;
use crate::trial::{simulate_trial, trial_rng, TrialOutcome};

/// Run every trial, keep the raw outcomes, and build exact distributions.
pub(crate) fn run_orchestrated(
    config: &SimulationConfig,
    seed: u64,
) -> VintageResult<Vec<MetricDistribution>> {
    let market = &config.market;
    let law = PowerLawExit::calibrate(market.exit_multiple_median, market.exit_multiple_p90)?;

    let outcomes: Vec<TrialOutcome> = (0..config.num_trials)
        .into_par_iter()
        .map(|trial| {
            let mut rng = trial_rng(seed, trial);
            simulate_trial(config, &law, &mut rng)
        })
        .collect();

    Ok(distributions_from_outcomes(&outcomes))
}

/// Exact per-metric distributions from materialized outcomes. Statistics
/// come from the same running-moment formulas the streaming engine uses,
/// so the two plans agree on everything but percentile estimation error.
pub(crate) fn distributions_from_outcomes(outcomes: &[TrialOutcome]) -> Vec<MetricDistribution> {
    MetricType::ALL
        .iter()
        .map(|&metric| {
            let mut values: Vec<f64> = outcomes.iter().map(|o| o.metric(metric)).collect();
            values.sort_by(|a, b| a.total_cmp(b));

            let mut acc = MetricAccumulator::new();
            for &v in &values {
                acc.insert(v);
            }

            MetricDistribution {
                metric,
                percentiles: exact_percentiles(&values),
                statistics: acc.statistics(),
            }
        })
        .collect()
}
