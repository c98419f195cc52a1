mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::pipeline::{DashboardArgs, PipelineArgs};
use commands::plan::{AllocateArgs, SpilloverArgs, SummarizeArgs};
use commands::records::{ActivitiesArgs, HighlightsArgs};

/// Revenue-plan allocation and pipeline reporting
#[derive(Parser)]
#[command(
    name = "revplan",
    version,
    about = "Revenue-plan allocation and pipeline reporting",
    long_about = "Spreads OTC and recurring contract revenue over a 5-year monthly plan, \
                  summarises it by quarter, half and fiscal year, estimates FY+1 spillover, \
                  and aggregates pipeline entries into dashboard figures."
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
    /// Spread OTC and recurring revenue over the 60-month plan
    Allocate(AllocateArgs),
    /// Quarter, half-year and FY totals of twelve monthly amounts
    Summarize(SummarizeArgs),
    /// Estimate revenue spilling past the close-month fiscal year
    Spillover(SpilloverArgs),
    /// Pipeline dashboard: stats, stage funnel, monthly plan, distributions
    Dashboard(DashboardArgs),
    /// Filter and page the pipeline table
    Pipeline(PipelineArgs),
    /// Filter and page activity plans
    Activities(ActivitiesArgs),
    /// Filter and page highlights
    Highlights(HighlightsArgs),
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
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revplan_core=warn,revplan=warn".into()),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Allocate(args) => commands::plan::run_allocate(args),
        Commands::Summarize(args) => commands::plan::run_summarize(args),
        Commands::Spillover(args) => commands::plan::run_spillover(args),
        Commands::Dashboard(args) => commands::pipeline::run_dashboard(args),
        Commands::Pipeline(args) => commands::pipeline::run_pipeline(args),
        Commands::Activities(args) => commands::records::run_activities(args),
        Commands::Highlights(args) => commands::records::run_highlights(args),
        Commands::Version => {
            println!("revplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
