//! Expectation engine: deterministic probability-weighted branch sums over
//! the graduation/failure/exit chain. No RNG anywhere — two runs with the
//! same config are bitwise identical.

use chrono::Duration;

use vintage_core::constants::{EXPECTATION_QUANTILE_NODES, TOTAL_LOSS_RATE};
use vintage_core::models::{
    distributed, paid_in, CashFlow, MetricDistribution, MetricType, Percentiles, SimulationConfig,
    SummaryStatistics,
};
use vintage_core::VintageResult;
use vintage_xirr::solve_xirr;

use crate::sampler::PowerLawExit;

/// Expected exit multiple as the mean over a fixed quantile-node grid.
/// Closed-form Pareto means blow up when alpha ≤ 1; the node grid stays
/// finite for every valid calibration and is exactly reproducible.
pub(crate) fn expected_exit_multiple(law: &PowerLawExit) -> f64 {
    let n = EXPECTATION_QUANTILE_NODES;
    (0..n)
        .map(|i| law.quantile((i as f64 + 0.5) / n as f64))
        .sum::<f64>()
        / n as f64
}

/// Run the deterministic expectation engine.
pub(crate) fn run_expectation(config: &SimulationConfig) -> VintageResult<Vec<MetricDistribution>> {
    let market = &config.market;
    let law = PowerLawExit::calibrate(market.exit_multiple_median, market.exit_multiple_p90)?;
    let e_mult = expected_exit_multiple(&law);

    let stages = &market.stage_transitions;
    let n_stages = stages.len();
    let count = f64::from(config.portfolio.company_count);
    let year_date = |year: u32| config.inception + Duration::days(i64::from(year) * 365);

    // Probability mass and expected invested capital per stage, evolved
    // year by year. All companies are exchangeable, so one company's
    // expectation scales by the portfolio count.
    let mut mass = vec![0.0; n_stages];
    let mut capital = vec![0.0; n_stages];
    mass[0] = 1.0;
    capital[0] = config.portfolio.initial_check;

    let mut flows = vec![CashFlow::new(
        year_date(0),
        -config.portfolio.initial_check * count,
    )];

    for year in 1..=config.time_horizon_years {
        let mut next_mass = vec![0.0; n_stages];
        let mut next_capital = vec![0.0; n_stages];
        let mut exit_proceeds = 0.0;
        let mut follow_on_outflow = 0.0;

        for s in 0..n_stages {
            let m = mass[s];
            if m <= 0.0 {
                continue;
            }
            let c = capital[s];
            let graduate = stages[s].graduate;
            let remain = 1.0 - market.failure_rate - graduate;

            // Failure branch: mass and capital leave the system.
            let grad_m = m * graduate;
            let mut grad_c = c * graduate;

            if s + 1 == n_stages {
                // Exit branch: graduated capital returns at the expected
                // multiple.
                exit_proceeds += grad_c * e_mult;
            } else {
                if f64::from(year) <= market.hold_period_years {
                    let follow_on =
                        config.portfolio.follow_on_check * market.follow_on_probability * grad_m;
                    follow_on_outflow += follow_on;
                    grad_c += follow_on;
                }
                next_mass[s + 1] += grad_m;
                next_capital[s + 1] += grad_c;
            }

            next_mass[s] += m * remain;
            next_capital[s] += c * remain;
        }

        if follow_on_outflow > 0.0 {
            flows.push(CashFlow::new(year_date(year), -follow_on_outflow * count));
        }
        if exit_proceeds > 0.0 {
            flows.push(CashFlow::new(year_date(year), exit_proceeds * count));
        }
        mass = next_mass;
        capital = next_capital;
    }

    // Companies still private at the horizon are held at cost.
    let residual = capital.iter().sum::<f64>() * count;

    let paid = paid_in(&flows);
    let dist = distributed(&flows);
    let total = dist + residual;

    let (irr, multiple, dpi, tvpi, total_value) = if total <= 0.0 || paid <= 0.0 {
        (TOTAL_LOSS_RATE, 0.0, 0.0, 0.0, 0.0)
    } else {
        let mut irr_flows = flows.clone();
        if residual > 0.0 {
            irr_flows.push(CashFlow::new(year_date(config.time_horizon_years), residual));
        }
        let irr = solve_xirr(&irr_flows).unwrap_or(TOTAL_LOSS_RATE);
        (irr, total / paid, dist / paid, total / paid, total)
    };

    let point = |metric: MetricType, value: f64| MetricDistribution {
        metric,
        percentiles: Percentiles::point(value),
        statistics: SummaryStatistics { mean: value, std_dev: 0.0, min: value, max: value },
    };

    Ok(vec![
        point(MetricType::Irr, irr),
        point(MetricType::Multiple, multiple),
        point(MetricType::Dpi, dpi),
        point(MetricType::Tvpi, tvpi),
        point(MetricType::TotalValue, total_value),
    ])
}
