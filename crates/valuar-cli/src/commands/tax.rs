use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use valuar_core::tax::{FlatRateTaxEngine, TaxEngine, TaxProfile};

/// Arguments for a flat-rate sale tax simulation
#[derive(Args)]
pub struct TaxSimArgs {
    /// Sale valuation
    #[arg(long)]
    pub valuation: Decimal,

    /// Original acquisition cost of the stake being sold
    #[arg(long)]
    pub acquisition_cost: Decimal,

    /// Flat capital-gains rate (e.g. 0.25 for 25%)
    #[arg(long)]
    pub tax_rate: Decimal,
}

pub fn run_tax_sim(args: TaxSimArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = TaxProfile {
        acquisition_cost: args.acquisition_cost,
        tax_rate: args.tax_rate,
    };
    let result = FlatRateTaxEngine.compute(args.valuation, &profile)?;

    Ok(json!({
        "valuation": args.valuation,
        "result": serde_json::to_value(&result)?,
    }))
}
