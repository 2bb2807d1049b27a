use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// One derived valuation scenario.
///
/// Tax-related fields stay at zero until a tax engine is applied over the
/// scenario list; that is deliberate, not missing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub id: String,
    pub name: String,
    pub multiplier: Decimal,
    pub valuation: Money,
    pub total_tax: Money,
    pub net_return: Money,
    pub roi: Rate,
    pub effective_tax_rate: Rate,
    pub color: String,
}

/// Fixed scenario definitions: id, display name, multiplier, display color.
const SCENARIO_DEFS: [(&str, &str, Decimal, &str); 3] = [
    ("conservative", "Conservador", dec!(0.8), "#f97316"),
    ("base", "Base", dec!(1.0), "#3b82f6"),
    ("optimistic", "Optimista", dec!(1.2), "#22c55e"),
];

/// Derive the three fixed scenarios from a base valuation.
///
/// Pure function of the base value: `valuation = base * multiplier`, no
/// randomness, no side effects.
pub fn generate_scenarios(base_valuation: Money) -> Vec<ScenarioResult> {
    SCENARIO_DEFS
        .iter()
        .map(|(id, name, multiplier, color)| ScenarioResult {
            id: (*id).into(),
            name: (*name).into(),
            multiplier: *multiplier,
            valuation: base_valuation * *multiplier,
            total_tax: Decimal::ZERO,
            net_return: Decimal::ZERO,
            roi: Decimal::ZERO,
            effective_tax_rate: Decimal::ZERO,
            color: (*color).into(),
        })
        .collect()
}
