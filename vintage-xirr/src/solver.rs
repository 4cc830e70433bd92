//! `solve_xirr` — precondition checks, Newton-Raphson primary, Brent
//! fallback over an expanding bracket.

use vintage_core::constants::{
    BRENT_BRACKET_HIGH, BRENT_BRACKET_LOW, BRENT_BRACKET_MAX, BRENT_MAX_ITERATIONS,
    NEWTON_INITIAL_GUESS, NEWTON_MAX_ITERATIONS, NPV_TOLERANCE,
};
use vintage_core::errors::SolverError;
use vintage_core::models::{has_both_signs, CashFlow};

use crate::brent::brent;
use crate::newton::newton_raphson;
use crate::npv::{npv, npv_derivative};

/// Annualized internal rate of return for an irregular cash-flow series.
///
/// Preconditions: at least two flows, at least one strictly negative and one
/// strictly positive amount, and not all dates identical. Violations fail
/// with `InvalidCashFlowSign`.
pub fn solve_xirr(flows: &[CashFlow]) -> Result<f64, SolverError> {
    check_preconditions(flows)?;

    let anchor = flows
        .iter()
        .map(|f| f.date)
        .fold(flows[0].date, |earliest, date| earliest.min(date));
    let f = |rate: f64| npv(rate, flows, anchor);
    let df = |rate: f64| npv_derivative(rate, flows, anchor);

    let newton =
        newton_raphson(f, df, NEWTON_INITIAL_GUESS, NPV_TOLERANCE, NEWTON_MAX_ITERATIONS);
    if let Some(rate) = newton {
        // Newton can stall on a tiny step without actually zeroing the NPV;
        // accept its answer only when the residual is genuinely small.
        if rate.is_finite() && f(rate).abs() <= 1e-9 {
            return Ok(rate);
        }
    }

    brent_fallback(&f)
}

/// Brent over [-0.99, upper], expanding the upper bound geometrically when
/// the root lies above it. Extreme short-horizon multiples (10x in 6 months
/// annualizes to a rate around 100) need the expansion.
fn brent_fallback<F>(f: &F) -> Result<f64, SolverError>
where
    F: Fn(f64) -> f64,
{
    let mut upper = BRENT_BRACKET_HIGH;
    loop {
        match brent(f, BRENT_BRACKET_LOW, upper, NPV_TOLERANCE, BRENT_MAX_ITERATIONS) {
            Ok(rate) => return Ok(rate),
            Err(SolverError::RootNotBracketed { .. }) if upper < BRENT_BRACKET_MAX => {
                upper *= 10.0;
            }
            Err(err) => return Err(err),
        }
    }
}

fn check_preconditions(flows: &[CashFlow]) -> Result<(), SolverError> {
    if flows.len() < 2 {
        return Err(SolverError::InvalidCashFlowSign {
            reason: format!("need at least 2 cash flows, got {}", flows.len()),
        });
    }
    if !has_both_signs(flows) {
        return Err(SolverError::InvalidCashFlowSign {
            reason: "series needs at least one outflow and one inflow".to_string(),
        });
    }
    let first = flows[0].date;
    if flows.iter().all(|f| f.date == first) {
        return Err(SolverError::InvalidCashFlowSign {
            reason: "all cash flows share one date; no time dimension to annualize".to_string(),
        });
    }
    Ok(())
}
