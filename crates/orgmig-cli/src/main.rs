//! orgmig CLI
//!
//! Command-line interface for GitHub organization migration verification

use clap::{Parser, Subcommand};
use orgmig_core::logging_facility::{self, Profile};
use orgmig_core::MigrationConfig;
use orgmig_core_types::RunId;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "orgmig")]
#[command(about = "orgmig - GitHub organization migration verification", long_about = None)]
struct Cli {
    /// Config file (defaults to ./orgmig.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format on stderr: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two repository snapshots
    Diff(commands::diff::DiffArgs),
    /// Build the post-migration discrepancy report for a wave
    Report(commands::report::ReportArgs),
    /// Analyse GEI migration logs for one organization
    Logs(commands::logs::LogsArgs),
    /// Print the resolved configuration (tokens redacted)
    Config(commands::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_format);

    let run_id = RunId::new();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = MigrationConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Diff(args) => commands::diff::execute(args, &config),
        Commands::Report(args) => commands::report::execute(args, &config),
        Commands::Logs(args) => commands::logs::execute(args, &config),
        Commands::Config(args) => commands::config::execute(args, &config),
    }
}
