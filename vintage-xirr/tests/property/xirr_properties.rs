//! Property suite: for every well-posed cash-flow series the solver returns
//! a rate whose residual NPV is numerically zero.

use chrono::NaiveDate;
use proptest::prelude::*;

use vintage_core::models::CashFlow;
use vintage_xirr::{npv, solve_xirr};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// One investment at t0 followed by 1–5 later inflows. A conventional
/// series (single sign change) has exactly one IRR; the amount and date
/// ranges keep that root inside the solver's annualized-rate domain.
fn arb_conventional_series() -> impl Strategy<Value = Vec<CashFlow>> {
    (
        10.0f64..1000.0,
        prop::collection::vec((365u32..3650, 100.0f64..20_000.0), 1..6),
    )
        .prop_map(|(invested, inflows)| {
            let mut flows = vec![CashFlow::new(epoch(), -invested)];
            flows.extend(inflows.into_iter().map(|(offset_days, amount)| {
                CashFlow::new(epoch() + chrono::Duration::days(i64::from(offset_days)), amount)
            }));
            flows
        })
}

proptest! {
    #[test]
    fn residual_npv_is_zero_at_solved_rate(flows in arb_conventional_series()) {
        let rate = solve_xirr(&flows).unwrap();
        let residual = npv(rate, &flows, epoch());
        prop_assert!(
            residual.abs() < 1e-8,
            "rate {rate} leaves residual {residual} for {flows:?}"
        );
    }

    #[test]
    fn solved_rate_is_above_total_loss(flows in arb_conventional_series()) {
        let rate = solve_xirr(&flows).unwrap();
        prop_assert!(rate > -1.0);
        prop_assert!(rate.is_finite());
    }
}
