//! Scenario matrix generation: a deterministic MOIC grid over
//! (scenario, bucket) cells, plus the metadata the cache tier persists.

use serde_json::json;
use tracing::debug;

use vintage_core::constants::{OPTIMAL_SCENARIO_TOLERANCE, RECYCLING_MOIC_UPLIFT};
use vintage_core::errors::EngineError;
use vintage_core::models::MatrixConfig;
use vintage_core::VintageResult;

use crate::expectation::expected_exit_multiple;
use crate::sampler::PowerLawExit;

/// An uncompressed MOIC grid with its metadata. The cache tier encodes
/// this into a persistable `MatrixPayload`.
#[derive(Debug, Clone, PartialEq)]
pub struct MoicGrid {
    pub scenario_count: u32,
    pub bucket_count: u32,
    /// Row-major: `values[scenario * bucket_count + bucket]`.
    pub values: Vec<f64>,
    pub scenario_states: serde_json::Value,
    pub bucket_params: serde_json::Value,
    pub optimal_scenario_count: u32,
}

/// Generate the scenario matrix for a config. Fully deterministic: the
/// scenario axis walks fixed quantile nodes of the calibrated exit law, so
/// identical configs always produce identical grids.
pub fn generate_matrix(config: &MatrixConfig) -> VintageResult<MoicGrid> {
    validate(config)?;

    let law = PowerLawExit::calibrate(
        config.market.exit_multiple_median,
        config.market.exit_multiple_p90,
    )?;
    let e_mult = expected_exit_multiple(&law);

    let scenarios = config.scenario_count as usize;
    let buckets = config.bucket_definitions.len();

    // Scenario multiples at quantile midpoints, ascending.
    let scenario_multiples: Vec<f64> = (0..scenarios)
        .map(|i| law.quantile((i as f64 + 0.5) / scenarios as f64))
        .collect();

    let recycling_factor = if config.recycling_enabled {
        RECYCLING_MOIC_UPLIFT
    } else {
        1.0
    };

    let mut values = Vec::with_capacity(scenarios * buckets);
    for &multiple in &scenario_multiples {
        for (bucket, weight) in config
            .bucket_definitions
            .iter()
            .zip(config.correlation_weights.iter())
        {
            let moic = (multiple * weight * recycling_factor).clamp(bucket.lower, bucket.upper);
            values.push(moic);
        }
    }

    let scenario_states = json!(scenario_multiples
        .iter()
        .enumerate()
        .map(|(i, m)| {
            json!({
                "index": i,
                "quantile": (i as f64 + 0.5) / scenarios as f64,
                "exit_multiple": m,
            })
        })
        .collect::<Vec<_>>());

    let bucket_params = json!({
        "buckets": config.bucket_definitions,
        "correlation_weights": config.correlation_weights,
        "recycling_enabled": config.recycling_enabled,
        "expected_exit_multiple": e_mult,
        "taxonomy_version": config.taxonomy_version,
    });

    let optimal = optimal_scenario_count(&scenario_multiples);
    debug!(
        fund_id = %config.fund_id,
        scenarios,
        buckets,
        optimal,
        "generated scenario matrix"
    );

    Ok(MoicGrid {
        scenario_count: config.scenario_count,
        bucket_count: buckets as u32,
        values,
        scenario_states,
        bucket_params,
        optimal_scenario_count: optimal,
    })
}

/// Smallest scenario-prefix length whose running mean lands within
/// tolerance of the full-grid mean. Reported as metadata so callers can
/// size cheaper follow-up runs.
fn optimal_scenario_count(scenario_multiples: &[f64]) -> u32 {
    let n = scenario_multiples.len();
    let full_mean = scenario_multiples.iter().sum::<f64>() / n as f64;
    let mut running = 0.0;
    for (i, &m) in scenario_multiples.iter().enumerate() {
        running += m;
        let prefix_mean = running / (i + 1) as f64;
        if ((prefix_mean - full_mean) / full_mean).abs() <= OPTIMAL_SCENARIO_TOLERANCE {
            return (i + 1) as u32;
        }
    }
    n as u32
}

fn validate(config: &MatrixConfig) -> Result<(), EngineError> {
    let reject = |reason: String| Err(EngineError::InvalidConfig { reason });

    config.market.validate()?;
    if config.scenario_count == 0 {
        return reject("scenario_count must be positive".to_string());
    }
    if config.bucket_definitions.is_empty() {
        return reject("bucket_definitions must not be empty".to_string());
    }
    if config.correlation_weights.len() != config.bucket_definitions.len() {
        return reject(format!(
            "correlation_weights ({}) must match bucket_definitions ({})",
            config.correlation_weights.len(),
            config.bucket_definitions.len()
        ));
    }
    for bucket in &config.bucket_definitions {
        if !(bucket.lower >= 0.0) || !(bucket.upper > bucket.lower) {
            return reject(format!(
                "bucket '{}' needs 0 <= lower < upper, got [{}, {})",
                bucket.name, bucket.lower, bucket.upper
            ));
        }
    }
    for &w in &config.correlation_weights {
        if !(w > 0.0) || !w.is_finite() {
            return reject(format!("correlation weights must be positive and finite, got {w}"));
        }
    }
    Ok(())
}
