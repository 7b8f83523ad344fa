mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::{ScheduleArgs, ScheduledPaymentArgs, SplitArgs};
use commands::posting::LinesArgs;

/// Mortgage PITI amortization and payment-split calculations
#[derive(Parser)]
#[command(
    name = "piti",
    version,
    about = "Mortgage PITI amortization and payment-split calculations",
    long_about = "A CLI for decimal-precision mortgage bookkeeping calculations. \
                  Projects fixed-rate amortization schedules, splits recorded \
                  payments into principal/interest/taxes/insurance, and builds \
                  balanced double-entry line sets ready for posting."
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
    /// Project the full amortization table for a loan
    Schedule(ScheduleArgs),
    /// Split a recorded payment into principal, interest, and escrow
    Split(SplitArgs),
    /// Principal/interest for a single scheduled payment number
    ScheduledPayment(ScheduledPaymentArgs),
    /// Build the balanced ledger-line set for a confirmed split
    Lines(LinesArgs),
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
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Split(args) => commands::amortization::run_split(args),
        Commands::ScheduledPayment(args) => commands::amortization::run_scheduled_payment(args),
        Commands::Lines(args) => commands::posting::run_lines(args),
        Commands::Version => {
            println!("piti {}", env!("CARGO_PKG_VERSION"));
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
