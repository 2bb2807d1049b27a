use serde::{Deserialize, Serialize};

use crate::strategy::{CompactStrategy, StandardStrategy, ValuationStrategy};

/// Strategy selection tags accepted by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyTag {
    Simple,
    Extended,
    Master,
    Compact,
}

impl StrategyTag {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(StrategyTag::Simple),
            "extended" => Some(StrategyTag::Extended),
            "master" => Some(StrategyTag::Master),
            "compact" => Some(StrategyTag::Compact),
            _ => None,
        }
    }
}

/// Configuration handed to every created strategy.
///
/// Both flags are currently inert, reserved for the downstream tax-impact
/// simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub include_scenarios: bool,
    #[serde(default)]
    pub include_tax_simulation: bool,
}

/// Create a strategy from a requested tag.
///
/// `simple`, `extended` and `master` all map to the standard strategy;
/// `compact` to the compact one. Unrecognized tags fall back to the standard
/// strategy rather than failing.
pub fn create_strategy(tag: &str, config: StrategyConfig) -> Box<dyn ValuationStrategy> {
    match StrategyTag::parse(tag) {
        Some(StrategyTag::Compact) => Box::new(CompactStrategy::with_config(config)),
        _ => Box::new(StandardStrategy::with_config(config)),
    }
}
