use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples (e.g., 8.5x EV/EBITDA)
pub type Multiple = Decimal;

/// Financial profile of the company being valued.
///
/// Contact identity and qualitative fields ride along for the wizard and
/// downstream collaborators; only `industry`, `revenue` and `ebitda` drive
/// the calculation. The adjustment flags are collected by the extended
/// wizard variants but do not change calculation semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyFinancialProfile {
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default)]
    pub company_name: String,
    /// Free-text sector/industry name as entered by the user
    pub industry: String,
    /// Annual revenue, must be >= 0
    pub revenue: Money,
    /// Annual EBITDA, must be >= 0 for multiple math
    pub ebitda: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_advantage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_recurring_revenue: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_dependent: Option<bool>,
}

/// Low/high bounds around the point valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRange {
    pub min: Money,
    pub max: Money,
}

/// One multiplicative adjustment applied by the standard strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    pub label: String,
    pub factor: Decimal,
}

/// Breakdown of how the final multiple was arrived at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiplesDetail {
    pub multiple_used: Multiple,
    pub base_multiple: Multiple,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<AppliedAdjustment>,
}

/// Output of a valuation calculation.
///
/// Invariants: `range.min <= final_valuation <= range.max`,
/// `final_valuation = ebitda * multiple_used`, `multiple_used > 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub multiple_used: Multiple,
    pub final_valuation: Money,
    pub range: ValuationRange,
    pub multiples: MultiplesDetail,
}
