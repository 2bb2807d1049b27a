use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use valuar_core::multiples::{SectorDatasetRow, SectorMultipleResolver, SectorMultipleTable};

use crate::input;

/// Arguments for sector-multiple resolution
#[derive(Args)]
pub struct ResolveMultipleArgs {
    /// Free-text sector name
    #[arg(long)]
    pub sector: String,

    /// EBITDA amount used to pick the band
    #[arg(long)]
    pub ebitda: Decimal,

    /// Path to a JSON dataset file (array of sector rows); defaults to the
    /// built-in matrix
    #[arg(long)]
    pub dataset: Option<String>,
}

pub fn run_resolve(args: ResolveMultipleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let resolver = match args.dataset {
        Some(ref path) => {
            let rows: Vec<SectorDatasetRow> = input::file::read_json(path)?;
            SectorMultipleResolver::new(SectorMultipleTable::from_dataset(rows)?)
        }
        None => SectorMultipleResolver::default(),
    };

    let band = resolver.resolve(&args.sector, args.ebitda);
    Ok(json!({
        "sector": args.sector,
        "ebitda": args.ebitda,
        "band": serde_json::to_value(band)?,
    }))
}
