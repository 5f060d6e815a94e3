//! GEI log analysis command

use clap::Args;
use orgmig_core::migration_log::parser::ORG_LOG_FILE;
use orgmig_core::migration_log::{
    parse_org_log, parse_repo_logs, write_analysis, FindingLevel, Outcome,
};
use orgmig_core::MigrationConfig;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Log directory holding README.md, success/ and failure/ (defaults to config logs_dir)
    pub dir: Option<PathBuf>,

    /// Organization name used in the output tables and file names
    #[arg(long)]
    pub org: String,

    /// Directory receiving `<org>_timing_results.csv` and `<org>_results.csv`
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

pub fn execute(args: LogsArgs, config: &MigrationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dir = args.dir.unwrap_or_else(|| config.logs_dir.clone());

    if dir.join(ORG_LOG_FILE).is_file() {
        let timing = parse_org_log(&args.org, &dir)?;
        println!(
            "Organization {} migrated in {} minutes ({} to {})",
            timing.org,
            timing.duration_mins,
            timing.start_time.format("%Y-%m-%d %H:%M:%S"),
            timing.end_time.format("%Y-%m-%d %H:%M:%S")
        );
    }

    let analysis = parse_repo_logs(&args.org, &dir)?;
    let (timing_path, findings_path) = write_analysis(&args.output_dir, &args.org, &analysis)?;

    println!(
        "Repositories: {} succeeded, {} failed",
        analysis.count(Outcome::Success),
        analysis.count(Outcome::Failure)
    );
    println!(
        "Findings: {} warnings, {} errors",
        analysis.count_findings(FindingLevel::Warn),
        analysis.count_findings(FindingLevel::Error)
    );
    println!("Timing written to {}", timing_path.display());
    println!("Findings written to {}", findings_path.display());
    Ok(())
}
