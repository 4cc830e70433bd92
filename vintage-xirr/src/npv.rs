//! Net present value of an irregular cash-flow series.

use chrono::NaiveDate;

use vintage_core::constants::DAYS_PER_YEAR;
use vintage_core::models::CashFlow;

/// Year fraction between the anchor date and a flow date (actual/365).
fn year_fraction(anchor: NaiveDate, date: NaiveDate) -> f64 {
    (date - anchor).num_days() as f64 / DAYS_PER_YEAR
}

/// NPV(rate) = Σ amount_i / (1 + rate)^(days_i / 365), days measured from
/// `anchor` (the earliest flow). Returns NaN for rate ≤ -1, where the
/// discount base is non-positive.
pub fn npv(rate: f64, flows: &[CashFlow], anchor: NaiveDate) -> f64 {
    let base = 1.0 + rate;
    if base <= 0.0 {
        return f64::NAN;
    }
    flows
        .iter()
        .map(|f| f.amount / base.powf(year_fraction(anchor, f.date)))
        .sum()
}

/// d(NPV)/d(rate) = Σ -amount_i · t_i · (1 + rate)^(-t_i - 1).
pub fn npv_derivative(rate: f64, flows: &[CashFlow], anchor: NaiveDate) -> f64 {
    let base = 1.0 + rate;
    if base <= 0.0 {
        return f64::NAN;
    }
    flows
        .iter()
        .map(|f| {
            let t = year_fraction(anchor, f.date);
            -f.amount * t * base.powf(-t - 1.0)
        })
        .sum()
}
