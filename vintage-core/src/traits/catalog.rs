use crate::models::MarketParameters;

/// Read-only table of named historical MarketParameters presets.
pub trait IScenarioCatalog: Send + Sync {
    fn preset(&self, name: &str) -> Option<MarketParameters>;

    fn names(&self) -> Vec<String>;
}
