//! DistributionValidator — runs every invariant check and aggregates the
//! violations into a single error.

use tracing::warn;

use vintage_core::errors::{ValidationError, Violation};
use vintage_core::models::MetricDistribution;

/// Validates generated metric distributions. Stateless; construct once and
/// share freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionValidator;

impl DistributionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a single distribution. All checks run; every violation is
    /// reported together.
    pub fn validate(&self, dist: &MetricDistribution) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        check_monotonicity(dist, &mut violations);
        check_range(dist, &mut violations);
        check_sign(dist, &mut violations);
        check_finite(dist, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            warn!(
                metric = %dist.metric,
                count = violations.len(),
                "distribution failed validation"
            );
            Err(ValidationError::Invalid { violations })
        }
    }

    /// Validate a batch; violations from every distribution aggregate into
    /// one error.
    pub fn validate_all(&self, dists: &[MetricDistribution]) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        for dist in dists {
            if let Err(ValidationError::Invalid { violations: mut v }) = self.validate(dist) {
                violations.append(&mut v);
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid { violations })
        }
    }
}

/// p5 ≤ p25 ≤ p50 ≤ p75 ≤ p95.
fn check_monotonicity(dist: &MetricDistribution, violations: &mut Vec<Violation>) {
    let points = dist.percentiles.points();
    for pair in points.windows(2) {
        let (lo_name, lo) = pair[0];
        let (hi_name, hi) = pair[1];
        if lo > hi {
            violations.push(Violation {
                metric: dist.metric,
                check: "monotonicity",
                detail: format!("{lo_name} ({lo}) > {hi_name} ({hi})"),
            });
        }
    }
}

/// min ≤ max.
fn check_range(dist: &MetricDistribution, violations: &mut Vec<Violation>) {
    let s = &dist.statistics;
    if s.min > s.max {
        violations.push(Violation {
            metric: dist.metric,
            check: "range",
            detail: format!("min ({}) > max ({})", s.min, s.max),
        });
    }
}

/// Non-IRR metrics can never go negative.
fn check_sign(dist: &MetricDistribution, violations: &mut Vec<Violation>) {
    if dist.metric.is_non_negative() && dist.statistics.min < 0.0 {
        violations.push(Violation {
            metric: dist.metric,
            check: "sign",
            detail: format!("min is {}", dist.statistics.min),
        });
    }
}

/// Every reported number must be finite; a NaN percentile is a generator
/// bug, not a value.
fn check_finite(dist: &MetricDistribution, violations: &mut Vec<Violation>) {
    let s = &dist.statistics;
    let named = [
        ("p5", dist.percentiles.p5),
        ("p25", dist.percentiles.p25),
        ("p50", dist.percentiles.p50),
        ("p75", dist.percentiles.p75),
        ("p95", dist.percentiles.p95),
        ("mean", s.mean),
        ("std_dev", s.std_dev),
        ("min", s.min),
        ("max", s.max),
    ];
    for (name, value) in named {
        if !value.is_finite() {
            violations.push(Violation {
                metric: dist.metric,
                check: "finite",
                detail: format!("{name} is {value}"),
            });
        }
    }
}
