//! Streaming engine for large-N runs: fixed-size batches folded into
//! mergeable accumulators. Peak memory is proportional to the batch size
//! and the sketch width, never to the total trial count.

use rayon::prelude::*;
use tracing::debug;

use vintage_core::constants::TRIAL_BATCH_SIZE;
use vintage_core::models::{MetricDistribution, MetricType, SimulationConfig};
use vintage_core::VintageResult;

use crate::accumulator::MetricAccumulator;
use crate::sampler::PowerLawExit;
use crate::trial::{simulate_trial, trial_rng};

const METRICS: usize = MetricType::ALL.len();

/// Run trials in batches with bounded parallelism and merge the per-batch
/// accumulators. Trial RNG streams are keyed by global trial index, so the
/// outcome set is identical to an orchestrated run with the same seed.
pub(crate) fn run_streaming(
    config: &SimulationConfig,
    seed: u64,
) -> VintageResult<Vec<MetricDistribution>> {
    let market = &config.market;
    let law = PowerLawExit::calibrate(market.exit_multiple_median, market.exit_multiple_p90)?;

    let num_trials = config.num_trials;
    let num_batches = (num_trials as usize).div_ceil(TRIAL_BATCH_SIZE);
    debug!(num_trials, num_batches, batch_size = TRIAL_BATCH_SIZE, "streaming run");

    let merged: [MetricAccumulator; METRICS] = (0..num_batches)
        .into_par_iter()
        .map(|batch| {
            let start = (batch * TRIAL_BATCH_SIZE) as u32;
            let end = ((batch + 1) * TRIAL_BATCH_SIZE).min(num_trials as usize) as u32;
            let mut accs: [MetricAccumulator; METRICS] =
                std::array::from_fn(|_| MetricAccumulator::new());
            for trial in start..end {
                let mut rng = trial_rng(seed, trial);
                let outcome = simulate_trial(config, &law, &mut rng);
                for (slot, &metric) in accs.iter_mut().zip(MetricType::ALL.iter()) {
                    slot.insert(outcome.metric(metric));
                }
            }
            accs
        })
        .reduce(
            || std::array::from_fn(|_| MetricAccumulator::new()),
            |mut left, right| {
                for (l, r) in left.iter_mut().zip(right.iter()) {
                    l.merge(r);
                }
                left
            },
        );

    Ok(MetricType::ALL
        .iter()
        .zip(merged.iter())
        .map(|(&metric, acc)| MetricDistribution {
            metric,
            percentiles: acc.percentiles(),
            statistics: acc.statistics(),
        })
        .collect())
}
