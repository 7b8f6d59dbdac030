mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::deal::{CalculateArgs, ScheduleArgs};
use commands::grid::GridArgs;
use desking_core::DeskingError;

/// Exit status for requests the engine rejected (bad field or term).
const EXIT_INVALID_INPUT: i32 = 2;

/// Dealership desking calculations
#[derive(Parser)]
#[command(
    name = "desk",
    version,
    about = "Dealership desking calculations",
    long_about = "Structures a vehicle deal into sales tax, fees, amount financed and \
                  monthly payment with decimal precision. Also builds amortization \
                  schedules and payment grids across terms."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Dealer profile (YAML or JSON) supplying tax, fee and term defaults
    #[arg(long, env = "DESK_PROFILE", global = true)]
    profile: Option<String>,

    /// Log filter, e.g. "debug" or "desking_core=trace" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Desk a deal: sales tax, fees, amount financed, monthly payment
    Calculate(CalculateArgs),
    /// Month-by-month amortization schedule for a deal
    Schedule(ScheduleArgs),
    /// Payment grid sweeping one deal variable across loan terms
    Grid(GridArgs),
    /// Print the effective dealer profile
    Profile,
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
    logging::init_logging(cli.log_level.as_deref());

    let profile = match config::load_profile(cli.profile.as_deref()) {
        Ok(p) => p,
        Err(e) => fail(e),
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::deal::run_calculate(args, &profile),
        Commands::Schedule(args) => commands::deal::run_schedule(args, &profile),
        Commands::Grid(args) => commands::grid::run_grid(args, &profile),
        Commands::Profile => serde_json::to_value(&profile).map_err(Into::into),
        Commands::Version => {
            println!("desk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    if let Some(err) = e.downcast_ref::<DeskingError>() {
        tracing::debug!(error = %err, "request rejected");
        match serde_json::to_string_pretty(&err.to_response()) {
            Ok(body) => eprintln!("{body}"),
            Err(_) => eprintln!("{}: {}", "error".red().bold(), err),
        }
        process::exit(EXIT_INVALID_INPUT);
    }
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}
