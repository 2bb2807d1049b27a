use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use crate::multiples::SectorMultipleResolver;
use crate::strategy::{check_financials, round_multiple, StrategyConfig, ValuationStrategy};
use crate::types::{
    AppliedAdjustment, CompanyFinancialProfile, Multiple, MultiplesDetail, ValuationRange,
    ValuationResult,
};
use crate::ValuarResult;

const RANGE_LOW: Decimal = dec!(0.8);
const RANGE_HIGH: Decimal = dec!(1.2);

/// Detailed, adjustment-driven valuation strategy.
///
/// The base multiple comes from the sector-matrix resolver when one is
/// attached and recognizes the industry; otherwise from the coarse built-in
/// industry table, falling back to a default multiple for unknown
/// industries.
#[derive(Debug, Clone)]
pub struct StandardStrategy {
    base_multiples: BTreeMap<String, Multiple>,
    default_multiple: Multiple,
    resolver: Option<SectorMultipleResolver>,
    pub config: StrategyConfig,
}

impl Default for StandardStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardStrategy {
    pub fn new() -> Self {
        Self {
            base_multiples: default_base_multiples(),
            default_multiple: dec!(5.0),
            resolver: None,
            config: StrategyConfig::default(),
        }
    }

    pub fn with_config(config: StrategyConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Attach a sector-matrix resolver; when it recognizes the industry the
    /// band midpoint replaces the table lookup as the base multiple.
    pub fn with_resolver(mut self, resolver: SectorMultipleResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Swap the industry table, mainly for tests.
    pub fn with_base_multiples(
        mut self,
        base_multiples: BTreeMap<String, Multiple>,
        default_multiple: Multiple,
    ) -> Self {
        self.base_multiples = base_multiples;
        self.default_multiple = default_multiple;
        self
    }

    fn base_multiple(&self, profile: &CompanyFinancialProfile) -> Multiple {
        if let Some(resolver) = &self.resolver {
            if let Some(band) = resolver.resolve(&profile.industry, profile.ebitda) {
                return (band.low + band.high) / dec!(2);
            }
        }
        let key = profile.industry.trim().to_lowercase();
        self.base_multiples
            .get(&key)
            .copied()
            .unwrap_or(self.default_multiple)
    }
}

impl ValuationStrategy for StandardStrategy {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn calculate(&self, profile: &CompanyFinancialProfile) -> ValuarResult<ValuationResult> {
        check_financials(profile)?;

        let base = self.base_multiple(profile);
        let mut multiple = base;
        let mut adjustments: Vec<AppliedAdjustment> = Vec::new();

        // Revenue-size adjustment
        if profile.revenue > dec!(10_000_000) {
            multiple *= dec!(1.10);
            adjustments.push(AppliedAdjustment {
                label: "revenue-size".into(),
                factor: dec!(1.10),
            });
        } else if profile.revenue < dec!(1_000_000) {
            multiple *= dec!(0.90);
            adjustments.push(AppliedAdjustment {
                label: "revenue-size".into(),
                factor: dec!(0.90),
            });
        }

        // Margin adjustment, skipped entirely when revenue is zero
        if profile.revenue > Decimal::ZERO {
            let margin = profile.ebitda / profile.revenue;
            if margin > dec!(0.20) {
                multiple *= dec!(1.05);
                adjustments.push(AppliedAdjustment {
                    label: "ebitda-margin".into(),
                    factor: dec!(1.05),
                });
            } else if margin < dec!(0.10) {
                multiple *= dec!(0.95);
                adjustments.push(AppliedAdjustment {
                    label: "ebitda-margin".into(),
                    factor: dec!(0.95),
                });
            }
        }

        let multiple_used = round_multiple(multiple);
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
                base_multiple: base,
                adjustments,
            },
        })
    }
}

/// Coarse industry table used when no sector-matrix entry applies.
fn default_base_multiples() -> BTreeMap<String, Multiple> {
    BTreeMap::from([
        ("tecnologia".to_string(), dec!(8.5)),
        ("salud".to_string(), dec!(7.2)),
        ("energia".to_string(), dec!(6.4)),
        ("industrial".to_string(), dec!(5.8)),
        ("logistica-transporte".to_string(), dec!(5.5)),
        ("servicios".to_string(), dec!(5.4)),
        ("alimentacion-distribucion".to_string(), dec!(5.2)),
        ("retail".to_string(), dec!(5.0)),
        ("hosteleria-turismo".to_string(), dec!(4.8)),
        ("construccion".to_string(), dec!(4.2)),
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
    fn test_high_margin_tech_company() {
        // Margin 25% > 20% so x1.05; revenue neither >10M nor <1M.
        let strategy = StandardStrategy::new();
        let result = strategy
            .calculate(&profile("tecnologia", dec!(8_000_000), dec!(2_000_000)))
            .unwrap();

        assert_eq!(result.multiple_used, dec!(8.93));
        assert_eq!(result.final_valuation, dec!(17_860_000));
        assert_eq!(result.range.min, dec!(14_288_000.0));
        assert_eq!(result.range.max, dec!(21_432_000.0));
    }

    #[test]
    fn test_small_low_margin_company_stacks_adjustments() {
        // Revenue < 1M => x0.90; margin 8% < 10% => x0.95.
        // 8.5 * 0.90 * 0.95 = 7.2675, rounded to 7.27 before multiplying.
        let strategy = StandardStrategy::new();
        let result = strategy
            .calculate(&profile("tecnologia", dec!(500_000), dec!(40_000)))
            .unwrap();

        assert_eq!(result.multiple_used, dec!(7.27));
        assert_eq!(result.final_valuation, dec!(40_000) * dec!(7.27));
        assert_eq!(result.multiples.adjustments.len(), 2);
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // 8.5 * 1.05 = 8.925 must round to 8.93, not banker's 8.92.
        let strategy = StandardStrategy::new();
        let result = strategy
            .calculate(&profile("tecnologia", dec!(5_000_000), dec!(1_250_000)))
            .unwrap();
        assert_eq!(result.multiple_used, dec!(8.93));
    }

    #[test]
    fn test_large_revenue_adjustment() {
        // Revenue > 10M => x1.10; margin 2/12 ~ 16.7%, no margin adjustment.
        let strategy = StandardStrategy::new();
        let result = strategy
            .calculate(&profile("tecnologia", dec!(12_000_000), dec!(2_000_000)))
            .unwrap();
        assert_eq!(result.multiple_used, dec!(9.35));
        assert_eq!(result.final_valuation, dec!(18_700_000.0));
    }

    #[test]
    fn test_unknown_industry_uses_default_multiple() {
        let strategy = StandardStrategy::new();
        let result = strategy
            .calculate(&profile("astrología", dec!(2_000_000), dec!(300_000)))
            .unwrap();
        // Default 5.0, margin 15% in the neutral band, mid-size revenue.
        assert_eq!(result.multiples.base_multiple, dec!(5.0));
        assert_eq!(result.multiple_used, dec!(5.0));
    }

    #[test]
    fn test_zero_revenue_skips_margin_adjustment() {
        // Size adjustment still applies (0 < 1M) but the margin branch must
        // short-circuit instead of dividing by zero.
        let strategy = StandardStrategy::new();
        let result = strategy
            .calculate(&profile("tecnologia", Decimal::ZERO, dec!(100_000)))
            .unwrap();
        assert_eq!(result.multiple_used, dec!(7.65));
        assert_eq!(result.final_valuation, dec!(765_000.00));
        assert_eq!(result.multiples.adjustments.len(), 1);
    }

    #[test]
    fn test_negative_financials_rejected() {
        let strategy = StandardStrategy::new();
        assert!(strategy
            .calculate(&profile("retail", dec!(-1), dec!(100_000)))
            .is_err());
        assert!(strategy
            .calculate(&profile("retail", dec!(1_000_000), dec!(-1)))
            .is_err());
    }

    #[test]
    fn test_range_contains_final_valuation() {
        let strategy = StandardStrategy::new();
        for (rev, ebitda) in [
            (dec!(500_000), dec!(40_000)),
            (dec!(3_000_000), dec!(700_000)),
            (dec!(25_000_000), dec!(4_000_000)),
        ] {
            let result = strategy.calculate(&profile("industrial", rev, ebitda)).unwrap();
            assert!(result.range.min <= result.final_valuation);
            assert!(result.final_valuation <= result.range.max);
        }
    }

    #[test]
    fn test_resolver_band_midpoint_overrides_table() {
        let strategy =
            StandardStrategy::new().with_resolver(SectorMultipleResolver::default());
        // salud at 1.0M resolves to band {6.5, 9.5}; midpoint 8.0. Margin
        // exactly 20% stays in the neutral band.
        let result = strategy
            .calculate(&profile("salud", dec!(5_000_000), dec!(1_000_000)))
            .unwrap();
        assert_eq!(result.multiples.base_multiple, dec!(8.0));
        assert_eq!(result.multiple_used, dec!(8.00));
        assert_eq!(result.final_valuation, dec!(8_000_000.00));
    }

    #[test]
    fn test_resolver_miss_falls_back_to_table() {
        let strategy =
            StandardStrategy::new().with_resolver(SectorMultipleResolver::default());
        let result = strategy
            .calculate(&profile("astrología", dec!(2_000_000), dec!(300_000)))
            .unwrap();
        assert_eq!(result.multiples.base_multiple, dec!(5.0));
    }

    #[test]
    fn test_no_scenario_capability() {
        let strategy = StandardStrategy::new();
        let scenarios = strategy
            .generate_scenarios(&profile("retail", dec!(1_000_000), dec!(200_000)))
            .unwrap();
        assert!(scenarios.is_none());
    }
}
