use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use crate::scenarios::{generate_scenarios, ScenarioResult};
use crate::strategy::{check_financials, round_multiple, StrategyConfig, ValuationStrategy};
use crate::types::{
    CompanyFinancialProfile, Multiple, MultiplesDetail, ValuationRange, ValuationResult,
};
use crate::ValuarResult;

const RANGE_LOW: Decimal = dec!(0.85);
const RANGE_HIGH: Decimal = dec!(1.15);

/// Fast, coarse valuation strategy: a small quick-multiple table, no
/// adjustments, a tighter range, and scenario generation.
#[derive(Debug, Clone)]
pub struct CompactStrategy {
    quick_multiples: BTreeMap<String, Multiple>,
    default_multiple: Multiple,
    pub config: StrategyConfig,
}

impl Default for CompactStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactStrategy {
    pub fn new() -> Self {
        Self {
            quick_multiples: default_quick_multiples(),
            default_multiple: dec!(4.0),
            config: StrategyConfig::default(),
        }
    }

    pub fn with_config(config: StrategyConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    fn quick_multiple(&self, industry: &str) -> Multiple {
        let key = industry.trim().to_lowercase();
        self.quick_multiples
            .get(&key)
            .copied()
            .unwrap_or(self.default_multiple)
    }
}

impl ValuationStrategy for CompactStrategy {
    fn name(&self) -> &'static str {
        "compact"
    }

    fn calculate(&self, profile: &CompanyFinancialProfile) -> ValuarResult<ValuationResult> {
        check_financials(profile)?;

        let multiple_used = round_multiple(self.quick_multiple(&profile.industry));
        let final_valuation = profile.ebitda * multiple_used;

        Ok(ValuationResult {
            multiple_used,
            final_valuation,
            range: ValuationRange {
                min: final_valuation * RANGE_LOW,
                max: final_valuation * RANGE_HIGH,
            },
            multiples: MultiplesDetail {
                multiple_used,
                base_multiple: multiple_used,
                adjustments: Vec::new(),
            },
        })
    }

    fn generate_scenarios(
        &self,
        profile: &CompanyFinancialProfile,
    ) -> ValuarResult<Option<Vec<ScenarioResult>>> {
        let base = self.calculate(profile)?.final_valuation;
        Ok(Some(generate_scenarios(base)))
    }
}

fn default_quick_multiples() -> BTreeMap<String, Multiple> {
    BTreeMap::from([
        ("tecnologia".to_string(), dec!(6.0)),
        ("salud".to_string(), dec!(5.5)),
        ("energia".to_string(), dec!(5.2)),
        ("industrial".to_string(), dec!(4.8)),
        ("logistica-transporte".to_string(), dec!(4.6)),
        ("servicios".to_string(), dec!(4.5)),
        ("alimentacion-distribucion".to_string(), dec!(4.2)),
        ("retail".to_string(), dec!(4.0)),
        ("hosteleria-turismo".to_string(), dec!(4.0)),
        ("construccion".to_string(), dec!(3.8)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn profile(industry: &str, revenue: Decimal, ebitda: Decimal) -> CompanyFinancialProfile {
        CompanyFinancialProfile {
            industry: industry.to_string(),
            revenue,
            ebitda,
            ..Default::default()
        }
    }

    #[test]
    fn test_retail_quick_valuation() {
        let strategy = CompactStrategy::new();
        let result = strategy
            .calculate(&profile("retail", dec!(3_000_000), dec!(500_000)))
            .unwrap();

        assert_eq!(result.multiple_used, dec!(4.0));
        assert_eq!(result.final_valuation, dec!(2_000_000));
        assert_eq!(result.range.min, dec!(1_700_000));
        assert_eq!(result.range.max, dec!(2_300_000));
    }

    #[test]
    fn test_no_adjustments_applied() {
        // Small revenue and extreme margin must not move the multiple.
        let strategy = CompactStrategy::new();
        let result = strategy
            .calculate(&profile("retail", dec!(500_000), dec!(400_000)))
            .unwrap();
        assert_eq!(result.multiple_used, dec!(4.0));
        assert!(result.multiples.adjustments.is_empty());
    }

    #[test]
    fn test_unknown_industry_default_multiple() {
        let strategy = CompactStrategy::new();
        let result = strategy
            .calculate(&profile("numismática", dec!(1_000_000), dec!(100_000)))
            .unwrap();
        assert_eq!(result.multiple_used, dec!(4.0));
    }

    #[test]
    fn test_scenarios_from_base_valuation() {
        let strategy = CompactStrategy::new();
        let scenarios = strategy
            .generate_scenarios(&profile("retail", dec!(3_000_000), dec!(500_000)))
            .unwrap()
            .expect("compact strategy must support scenarios");

        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].valuation, dec!(1_600_000));
        assert_eq!(scenarios[1].valuation, dec!(2_000_000));
        assert_eq!(scenarios[2].valuation, dec!(2_400_000));
    }

    #[test]
    fn test_range_contains_final_valuation() {
        let strategy = CompactStrategy::new();
        let result = strategy
            .calculate(&profile("tecnologia", dec!(4_000_000), dec!(900_000)))
            .unwrap();
        assert!(result.range.min <= result.final_valuation);
        assert!(result.final_valuation <= result.range.max);
    }

    #[test]
    fn test_negative_ebitda_rejected() {
        let strategy = CompactStrategy::new();
        assert!(strategy
            .calculate(&profile("retail", dec!(1_000_000), dec!(-100)))
            .is_err());
    }
}
