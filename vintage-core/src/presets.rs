//! Built-in historical-scenario parameter presets.
//!
//! A small, read-only catalog keyed by era name. Production deployments can
//! substitute their own `IScenarioCatalog` backed by a real parameter table.

use std::collections::BTreeMap;

use crate::models::{MarketParameters, StageTransition};
use crate::traits::IScenarioCatalog;

/// In-memory preset catalog with the standard historical scenarios.
pub struct HistoricalCatalog {
    presets: BTreeMap<String, MarketParameters>,
}

fn ladder(seed: f64, series_a: f64, series_b: f64) -> Vec<StageTransition> {
    vec![
        StageTransition { stage: "seed".into(), graduate: seed },
        StageTransition { stage: "series-a".into(), graduate: series_a },
        StageTransition { stage: "series-b".into(), graduate: series_b },
    ]
}

impl HistoricalCatalog {
    pub fn new() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert(
            "post-crisis-2009".to_string(),
            MarketParameters {
                exit_multiple_median: 1.4,
                exit_multiple_p90: 3.2,
                failure_rate: 0.25,
                follow_on_probability: 0.3,
                hold_period_years: 9.0,
                stage_transitions: ladder(0.3, 0.25, 0.2),
            },
        );
        presets.insert(
            "baseline-2015".to_string(),
            MarketParameters {
                exit_multiple_median: 2.0,
                exit_multiple_p90: 5.0,
                failure_rate: 0.15,
                follow_on_probability: 0.5,
                hold_period_years: 8.0,
                stage_transitions: ladder(0.4, 0.35, 0.3),
            },
        );
        presets.insert(
            "expansion-2021".to_string(),
            MarketParameters {
                exit_multiple_median: 2.8,
                exit_multiple_p90: 8.0,
                failure_rate: 0.12,
                follow_on_probability: 0.65,
                hold_period_years: 6.5,
                stage_transitions: ladder(0.5, 0.4, 0.35),
            },
        );
        Self { presets }
    }
}

impl Default for HistoricalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl IScenarioCatalog for HistoricalCatalog {
    fn preset(&self, name: &str) -> Option<MarketParameters> {
        self.presets.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }
}
