//! Canonical matrix key: a blake3 hash over the normalized config.
//!
//! Identical configs always hash identically. Normalization sorts bucket
//! definitions (with their correlation weights) by bucket name, and
//! serde_json's sorted object keys make the serialized form canonical.

use serde_json::json;

use vintage_core::models::MatrixConfig;

/// Deterministic cache key for a matrix config.
pub fn matrix_key(config: &MatrixConfig) -> String {
    let mut buckets: Vec<_> = config
        .bucket_definitions
        .iter()
        .zip(config.correlation_weights.iter())
        .map(|(b, w)| {
            json!({
                "name": b.name,
                "lower": b.lower,
                "upper": b.upper,
                "weight": w,
            })
        })
        .collect();
    buckets.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));

    let market = &config.market;
    let canonical = json!({
        "fund_id": config.fund_id,
        "taxonomy_version": config.taxonomy_version,
        "scenario_count": config.scenario_count,
        "buckets": buckets,
        "recycling_enabled": config.recycling_enabled,
        "market": {
            "exit_multiple_median": market.exit_multiple_median,
            "exit_multiple_p90": market.exit_multiple_p90,
            "failure_rate": market.failure_rate,
            "follow_on_probability": market.follow_on_probability,
            "hold_period_years": market.hold_period_years,
            "stages": market.stage_transitions,
        },
    });

    blake3::hash(canonical.to_string().as_bytes())
        .to_hex()
        .to_string()
}
