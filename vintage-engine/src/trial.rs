//! Single-trial fund simulation: stage-by-stage company transitions,
//! power-law exits, fund-level cash-flow aggregation, per-trial metrics.

use chrono::Duration;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use vintage_core::constants::TOTAL_LOSS_RATE;
use vintage_core::models::{distributed, paid_in, CashFlow, MetricType, SimulationConfig};
use vintage_xirr::solve_xirr;

use crate::sampler::PowerLawExit;

/// Per-trial fund metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrialOutcome {
    pub irr: f64,
    pub multiple: f64,
    pub dpi: f64,
    pub tvpi: f64,
    pub total_value: f64,
}

impl TrialOutcome {
    pub fn metric(&self, metric: MetricType) -> f64 {
        match metric {
            MetricType::Irr => self.irr,
            MetricType::Multiple => self.multiple,
            MetricType::Dpi => self.dpi,
            MetricType::Tvpi => self.tvpi,
            MetricType::TotalValue => self.total_value,
        }
    }

    /// Total-write-off outcome: the documented imputation convention for a
    /// series the solver cannot meaningfully price.
    fn total_loss() -> Self {
        Self {
            irr: TOTAL_LOSS_RATE,
            multiple: 0.0,
            dpi: 0.0,
            tvpi: 0.0,
            total_value: 0.0,
        }
    }
}

/// RNG for one trial. Each trial gets its own ChaCha stream off the run
/// seed, so outcomes are reproducible and independent of batch scheduling.
pub(crate) fn trial_rng(seed: u64, trial: u32) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(u64::from(trial) + 1);
    rng
}

/// Simulate one fund trial.
pub(crate) fn simulate_trial<R: Rng + ?Sized>(
    config: &SimulationConfig,
    law: &PowerLawExit,
    rng: &mut R,
) -> TrialOutcome {
    let market = &config.market;
    let stages = &market.stage_transitions;
    let horizon = config.time_horizon_years;

    let mut flows: Vec<CashFlow> = Vec::new();
    let mut residual_value = 0.0;

    let year_date = |year: u32| config.inception + Duration::days(i64::from(year) * 365);

    for _ in 0..config.portfolio.company_count {
        let mut invested = config.portfolio.initial_check;
        flows.push(CashFlow::new(year_date(0), -config.portfolio.initial_check));

        let mut stage = 0usize;
        let mut alive = true;
        for year in 1..=horizon {
            let u: f64 = rng.gen();
            if u < market.failure_rate {
                // Write-off: invested capital is gone.
                alive = false;
                break;
            }
            if u < market.failure_rate + stages[stage].graduate {
                stage += 1;
                if stage == stages.len() {
                    // Graduated out of the ladder: exit at a power-law multiple.
                    let multiple = law.sample(rng);
                    flows.push(CashFlow::new(year_date(year), invested * multiple));
                    alive = false;
                    break;
                }
                // The fund stops writing follow-on checks past the hold period.
                if f64::from(year) <= market.hold_period_years
                    && rng.gen::<f64>() < market.follow_on_probability
                {
                    flows.push(CashFlow::new(year_date(year), -config.portfolio.follow_on_check));
                    invested += config.portfolio.follow_on_check;
                }
            }
            // Otherwise the company remains in stage for the year.
        }
        if alive {
            // Still private at horizon: held at cost.
            residual_value += invested;
        }
    }

    outcome_from_flows(&flows, residual_value, year_date(horizon))
}

/// Fund metrics from aggregated flows plus residual value at the horizon.
pub(crate) fn outcome_from_flows(
    flows: &[CashFlow],
    residual_value: f64,
    horizon_date: chrono::NaiveDate,
) -> TrialOutcome {
    let paid = paid_in(flows);
    let dist = distributed(flows);
    let total = dist + residual_value;

    if total <= 0.0 || paid <= 0.0 {
        return TrialOutcome::total_loss();
    }

    let mut irr_flows = flows.to_vec();
    if residual_value > 0.0 {
        irr_flows.push(CashFlow::new(horizon_date, residual_value));
    }
    // A series the solver cannot bracket (e.g. a recovery under 1% of
    // capital) imputes the total-loss rate rather than being excluded.
    let irr = solve_xirr(&irr_flows).unwrap_or(TOTAL_LOSS_RATE);

    TrialOutcome {
        irr,
        multiple: total / paid,
        dpi: dist / paid,
        tvpi: total / paid,
        total_value: total,
    }
}
