mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analyze::AnalyzeArgs;

/// Financial statement analysis with decimal precision
#[derive(Parser)]
#[command(
    name = "fsa",
    version,
    about = "Financial statement analysis with decimal precision",
    long_about = "A CLI for analyzing financial statements with decimal precision. \
                  Computes liquidity, profitability, leverage, activity, growth, \
                  market, risk, structural, stability, performance, and composite \
                  metrics, each packaged \
                  with a rating tier, interpretation, insights, and benchmark \
                  comparison."
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
    /// Analyze financial statements across the enabled metric domains
    Analyze(AnalyzeArgs),
    /// List the enabled metric domains and their metrics
    Domains,
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
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Domains => commands::catalog::run_domains(),
        Commands::Version => {
            println!("fsa {}", env!("CARGO_PKG_VERSION"));
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
