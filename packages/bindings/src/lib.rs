use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use valuar_core::strategy::{create_strategy, StrategyConfig};
use valuar_core::types::CompanyFinancialProfile;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(field: &str, value: &str) -> NapiResult<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|_| napi::Error::from_reason(format!("{field} is not a valid decimal: {value}")))
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_valuation(strategy_tag: String, profile_json: String) -> NapiResult<String> {
    let profile: CompanyFinancialProfile =
        serde_json::from_str(&profile_json).map_err(to_napi_error)?;
    let strategy = create_strategy(&strategy_tag, StrategyConfig::default());
    let result = strategy.calculate(&profile).map_err(to_napi_error)?;
    serde_json::to_string(&result).map_err(to_napi_error)
}

#[napi]
pub fn generate_scenarios(profile_json: String) -> NapiResult<String> {
    let profile: CompanyFinancialProfile =
        serde_json::from_str(&profile_json).map_err(to_napi_error)?;
    let strategy = create_strategy("compact", StrategyConfig::default());
    let scenarios = strategy
        .generate_scenarios(&profile)
        .map_err(to_napi_error)?
        .unwrap_or_default();
    serde_json::to_string(&scenarios).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sector multiples
// ---------------------------------------------------------------------------

#[napi]
pub fn resolve_sector_multiple(sector: String, ebitda: String) -> NapiResult<String> {
    let ebitda = parse_decimal("ebitda", &ebitda)?;
    let resolver = valuar_core::multiples::SectorMultipleResolver::default();
    let band = resolver.resolve(&sector, ebitda);
    serde_json::to_string(&band).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tax simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_sale_tax(
    valuation: String,
    acquisition_cost: String,
    tax_rate: String,
) -> NapiResult<String> {
    use valuar_core::tax::{FlatRateTaxEngine, TaxEngine, TaxProfile};

    let profile = TaxProfile {
        acquisition_cost: parse_decimal("acquisition_cost", &acquisition_cost)?,
        tax_rate: parse_decimal("tax_rate", &tax_rate)?,
    };
    let valuation = parse_decimal("valuation", &valuation)?;
    let result = FlatRateTaxEngine
        .compute(valuation, &profile)
        .map_err(to_napi_error)?;
    serde_json::to_string(&result).map_err(to_napi_error)
}
