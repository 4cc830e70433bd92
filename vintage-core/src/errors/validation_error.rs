use std::fmt;

use crate::models::MetricType;

/// A single violated distribution invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Which metric's distribution violated the invariant.
    pub metric: MetricType,
    /// Check name: "monotonicity", "range", "sign", or "finite".
    pub check: &'static str,
    /// Human-readable description with the offending values.
    pub detail: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.metric, self.check, self.detail)
    }
}

fn fmt_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Distribution validator errors. Aggregated: every violated invariant is
/// reported, not just the first.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("distribution validation failed: {}", fmt_violations(violations))]
    Invalid { violations: Vec<Violation> },
}

impl ValidationError {
    /// The violations carried by this error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Invalid { violations } => violations,
        }
    }
}
