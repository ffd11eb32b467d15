mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::env;
use std::process;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::amortization::LoanArgs;
use commands::emi::EmiArgs;
use commands::scenarios::TenureArgs;

/// Loan amortization with prepayment and savings-offset scenarios
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan amortization with prepayment and savings-offset scenarios",
    long_about = "A CLI for building monthly loan amortization schedules with decimal \
                  precision. Supports one-time and recurring prepayments, interest \
                  offset from a linked savings balance, scenario comparison and \
                  tenure sweeps."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log schedule diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Level monthly installment for a loan
    Emi(EmiArgs),
    /// Month-by-month amortization schedule
    Schedule(LoanArgs),
    /// Compare base, prepayment, savings-linked and combined scenarios
    Scenarios(LoanArgs),
    /// Re-run the scenarios across several tenures
    Tenures(TenureArgs),
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

fn init_logging(verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::WARN)
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // `None` means the command already wrote its own output.
    let result: Result<Option<serde_json::Value>, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args).map(Some),
        Commands::Schedule(args) => match cli.output {
            OutputFormat::Csv => commands::amortization::run_schedule_export(args).map(|_| None),
            _ => commands::amortization::run_schedule(args).map(Some),
        },
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args).map(Some),
        Commands::Tenures(args) => commands::scenarios::run_tenures(args).map(Some),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            if let Some(value) = value {
                output::format_output(&cli.output, &value);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
