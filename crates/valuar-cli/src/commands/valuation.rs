use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use valuar_core::scenarios::generate_scenarios;
use valuar_core::strategy::{create_strategy, StrategyConfig};
use valuar_core::types::CompanyFinancialProfile;

use crate::input;

/// Arguments for a valuation run
#[derive(Args)]
pub struct ValuateArgs {
    /// Strategy tag: simple, extended, master or compact
    #[arg(long, default_value = "simple")]
    pub strategy: String,

    /// Free-text sector/industry name
    #[arg(long)]
    pub industry: Option<String>,

    /// Annual revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Annual EBITDA
    #[arg(long)]
    pub ebitda: Option<Decimal>,

    /// Also emit scenarios when the strategy supports them
    #[arg(long)]
    pub scenarios: bool,

    /// Path to JSON input file with a company profile (overrides flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for scenario derivation
#[derive(Args)]
pub struct ScenariosArgs {
    /// Base valuation to scale directly
    #[arg(long)]
    pub valuation: Option<Decimal>,

    /// Free-text sector/industry name (compact strategy path)
    #[arg(long)]
    pub industry: Option<String>,

    /// Annual revenue (compact strategy path)
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Annual EBITDA (compact strategy path)
    #[arg(long)]
    pub ebitda: Option<Decimal>,

    /// Path to JSON input file with a company profile
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_valuate(args: ValuateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = load_profile(
        args.input.as_deref(),
        args.industry,
        args.revenue,
        args.ebitda,
    )?;

    let strategy = create_strategy(&args.strategy, StrategyConfig::default());
    let result = strategy.calculate(&profile)?;

    let mut value = json!({
        "strategy": strategy.name(),
        "result": serde_json::to_value(&result)?,
    });

    if args.scenarios {
        if let Some(scenarios) = strategy.generate_scenarios(&profile)? {
            value["scenarios"] = serde_json::to_value(scenarios)?;
        }
    }

    Ok(value)
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios = if let Some(base) = args.valuation {
        generate_scenarios(base)
    } else {
        let profile = load_profile(
            args.input.as_deref(),
            args.industry,
            args.revenue,
            args.ebitda,
        )?;
        let strategy = create_strategy("compact", StrategyConfig::default());
        strategy
            .generate_scenarios(&profile)?
            .ok_or("compact strategy did not produce scenarios")?
    };

    Ok(json!({ "scenarios": serde_json::to_value(scenarios)? }))
}

fn load_profile(
    input: Option<&str>,
    industry: Option<String>,
    revenue: Option<Decimal>,
    ebitda: Option<Decimal>,
) -> Result<CompanyFinancialProfile, Box<dyn std::error::Error>> {
    if let Some(path) = input {
        return Ok(input::file::read_json(path)?);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    Ok(CompanyFinancialProfile {
        industry: industry.ok_or("--industry is required (or provide --input)")?,
        revenue: revenue.ok_or("--revenue is required (or provide --input)")?,
        ebitda: ebitda.ok_or("--ebitda is required (or provide --input)")?,
        ..Default::default()
    })
}
