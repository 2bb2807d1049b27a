mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::multiples::ResolveMultipleArgs;
use commands::tax::TaxSimArgs;
use commands::valuation::{ScenariosArgs, ValuateArgs};

/// Company valuation estimates from a handful of financial inputs
#[derive(Parser)]
#[command(
    name = "valuar",
    version,
    about = "Company valuation estimates from revenue, EBITDA and sector",
    long_about = "Estimates a defensible company valuation from revenue, EBITDA and a \
                  free-text sector name. Supports the detailed standard strategy with \
                  size and margin adjustments, a fast compact strategy with \
                  conservative/base/optimistic scenarios, sector-multiple band lookup \
                  and a flat-rate sale tax simulation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a valuation with the selected strategy
    Valuate(ValuateArgs),
    /// Derive conservative/base/optimistic scenarios
    Scenarios(ScenariosArgs),
    /// Resolve a sector name to its EBITDA-multiple band
    ResolveMultiple(ResolveMultipleArgs),
    /// Simulate flat-rate capital-gains tax on a sale
    TaxSim(TaxSimArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Valuate(args) => commands::valuation::run_valuate(args),
        Commands::Scenarios(args) => commands::valuation::run_scenarios(args),
        Commands::ResolveMultiple(args) => commands::multiples::run_resolve(args),
        Commands::TaxSim(args) => commands::tax::run_tax_sim(args),
        Commands::Version => {
            println!("valuar {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
