use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValuarError;
use crate::scenarios::ScenarioResult;
use crate::types::{Money, Rate};
use crate::ValuarResult;

/// Seller-side inputs for a sale tax simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxProfile {
    /// Original acquisition cost of the stake being sold
    pub acquisition_cost: Money,
    /// Flat capital-gains rate applied by the simple engine
    pub tax_rate: Rate,
}

/// Tax outcome for one valuation figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub total_tax: Money,
    pub net_return: Money,
    pub roi: Rate,
    pub effective_tax_rate: Rate,
}

/// Tax-impact computation seam.
///
/// The valuation core never computes tax itself; scenarios carry zeroed tax
/// fields until an engine is applied. A real jurisdiction-aware engine can
/// replace the flat-rate one without touching the valuation core.
pub trait TaxEngine {
    fn compute(&self, valuation: Money, profile: &TaxProfile) -> ValuarResult<TaxResult>;
}

/// Leaves every tax field at zero, matching scenarios with no tax engine
/// wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTaxEngine;

impl TaxEngine for NullTaxEngine {
    fn compute(&self, _valuation: Money, _profile: &TaxProfile) -> ValuarResult<TaxResult> {
        Ok(TaxResult {
            total_tax: Decimal::ZERO,
            net_return: Decimal::ZERO,
            roi: Decimal::ZERO,
            effective_tax_rate: Decimal::ZERO,
        })
    }
}

/// Flat-rate capital-gains engine: tax = rate * max(valuation - cost, 0).
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRateTaxEngine;

impl TaxEngine for FlatRateTaxEngine {
    fn compute(&self, valuation: Money, profile: &TaxProfile) -> ValuarResult<TaxResult> {
        if profile.tax_rate < Decimal::ZERO || profile.tax_rate > Decimal::ONE {
            return Err(ValuarError::InvalidInput {
                field: "tax_rate".into(),
                reason: "Tax rate must be between 0 and 1".into(),
            });
        }
        if profile.acquisition_cost < Decimal::ZERO {
            return Err(ValuarError::InvalidInput {
                field: "acquisition_cost".into(),
                reason: "Acquisition cost must be >= 0".into(),
            });
        }

        let gain = (valuation - profile.acquisition_cost).max(Decimal::ZERO);
        let total_tax = gain * profile.tax_rate;
        let net_return = valuation - total_tax;

        let roi = if profile.acquisition_cost > Decimal::ZERO {
            (net_return - profile.acquisition_cost) / profile.acquisition_cost
        } else {
            Decimal::ZERO
        };
        let effective_tax_rate = if valuation > Decimal::ZERO {
            total_tax / valuation
        } else {
            Decimal::ZERO
        };

        Ok(TaxResult {
            total_tax,
            net_return,
            roi,
            effective_tax_rate,
        })
    }
}

/// Fill the tax fields of a scenario list in place using the given engine.
pub fn apply_tax(
    scenarios: &mut [ScenarioResult],
    engine: &dyn TaxEngine,
    profile: &TaxProfile,
) -> ValuarResult<()> {
    for scenario in scenarios.iter_mut() {
        let tax = engine.compute(scenario.valuation, profile)?;
        scenario.total_tax = tax.total_tax;
        scenario.net_return = tax.net_return;
        scenario.roi = tax.roi;
        scenario.effective_tax_rate = tax.effective_tax_rate;
    }
    Ok(())
}
