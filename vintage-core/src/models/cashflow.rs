use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated, signed cash flow. Outflows (investments) are negative,
/// inflows (distributions) positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Total capital paid in: the sum of outflow magnitudes.
pub fn paid_in(flows: &[CashFlow]) -> f64 {
    flows
        .iter()
        .filter(|f| f.amount < 0.0)
        .map(|f| -f.amount)
        .sum()
}

/// Total capital distributed: the sum of inflows.
pub fn distributed(flows: &[CashFlow]) -> f64 {
    flows
        .iter()
        .filter(|f| f.amount > 0.0)
        .map(|f| f.amount)
        .sum()
}

/// Whether the series has at least one strictly negative and one strictly
/// positive amount.
pub fn has_both_signs(flows: &[CashFlow]) -> bool {
    flows.iter().any(|f| f.amount < 0.0) && flows.iter().any(|f| f.amount > 0.0)
}
