use std::fmt;

use serde::{Deserialize, Serialize};

/// Fund metric tracked by the simulation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Irr,
    Multiple,
    Dpi,
    Tvpi,
    TotalValue,
}

impl MetricType {
    /// All tracked metrics, in reporting order.
    pub const ALL: [MetricType; 5] = [
        MetricType::Irr,
        MetricType::Multiple,
        MetricType::Dpi,
        MetricType::Tvpi,
        MetricType::TotalValue,
    ];

    /// Whether this metric can never be negative. IRR is the only metric
    /// that legitimately goes below zero.
    pub fn is_non_negative(self) -> bool {
        !matches!(self, MetricType::Irr)
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricType::Irr => "irr",
            MetricType::Multiple => "multiple",
            MetricType::Dpi => "dpi",
            MetricType::Tvpi => "tvpi",
            MetricType::TotalValue => "total_value",
        };
        f.write_str(name)
    }
}

/// The five reported percentile points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl Percentiles {
    /// A degenerate point-mass distribution (expectation mode).
    pub fn point(value: f64) -> Self {
        Self { p5: value, p25: value, p50: value, p75: value, p95: value }
    }

    /// Percentile points as (label, value) pairs in ascending order.
    pub fn points(&self) -> [(&'static str, f64); 5] {
        [
            ("p5", self.p5),
            ("p25", self.p25),
            ("p50", self.p50),
            ("p75", self.p75),
            ("p95", self.p95),
        ]
    }
}

/// Summary statistics over trial outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Percentile distribution over one fund metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDistribution {
    pub metric: MetricType,
    pub percentiles: Percentiles,
    pub statistics: SummaryStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irr_is_the_only_signed_metric() {
        assert!(!MetricType::Irr.is_non_negative());
        assert!(MetricType::Multiple.is_non_negative());
        assert!(MetricType::Dpi.is_non_negative());
        assert!(MetricType::Tvpi.is_non_negative());
        assert!(MetricType::TotalValue.is_non_negative());
    }

    #[test]
    fn point_mass_percentiles_are_equal() {
        let p = Percentiles::point(1.5);
        assert!(p.points().iter().all(|(_, v)| *v == 1.5));
    }

    #[test]
    fn metric_type_serde_uses_snake_case() {
        let json = serde_json::to_string(&MetricType::TotalValue).unwrap();
        assert_eq!(json, "\"total_value\"");
    }
}
