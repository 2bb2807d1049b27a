pub mod compact;
pub mod factory;
pub mod standard;

pub use compact::CompactStrategy;
pub use factory::{create_strategy, StrategyConfig, StrategyTag};
pub use standard::StandardStrategy;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValuarError;
use crate::scenarios::ScenarioResult;
use crate::types::{CompanyFinancialProfile, Multiple, ValuationResult};
use crate::ValuarResult;

/// A polymorphic valuation calculation.
///
/// `generate_scenarios` is an optional capability; only the compact
/// strategy returns `Some`.
pub trait ValuationStrategy {
    fn name(&self) -> &'static str;

    fn calculate(&self, profile: &CompanyFinancialProfile) -> ValuarResult<ValuationResult>;

    fn generate_scenarios(
        &self,
        profile: &CompanyFinancialProfile,
    ) -> ValuarResult<Option<Vec<ScenarioResult>>> {
        let _ = profile;
        Ok(None)
    }
}

/// The engine assumes non-negative financials for multiple math.
pub(crate) fn check_financials(profile: &CompanyFinancialProfile) -> ValuarResult<()> {
    if profile.revenue < Decimal::ZERO {
        return Err(ValuarError::InvalidInput {
            field: "revenue".into(),
            reason: "Revenue must be >= 0".into(),
        });
    }
    if profile.ebitda < Decimal::ZERO {
        return Err(ValuarError::InvalidInput {
            field: "ebitda".into(),
            reason: "EBITDA must be >= 0 for multiple-based valuation".into(),
        });
    }
    Ok(())
}

/// Round an adjusted multiple to 2 decimal places, midpoint away from zero
/// (8.925 rounds to 8.93, not 8.92).
pub(crate) fn round_multiple(multiple: Multiple) -> Multiple {
    multiple.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
