//! Post-migration report command
//!
//! Compares `before-source` (baseline) with `after-target` (candidate) and
//! annotates each discrepancy with `after-source` (context).

use crate::commands::diff::compare_files;
use clap::Args;
use orgmig_core::errors::{ExError, ExErrorKind};
use orgmig_core::{MigrationConfig, Stage};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// `<before-source> <after-target> <after-source> <output>`, or only
    /// `<output>` together with --wave
    #[arg(required = true, num_args = 1..=4, value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Resolve snapshot paths from the configured snapshot directory
    #[arg(long)]
    pub wave: Option<u32>,

    /// Use the dry-run snapshots of the wave
    #[arg(long, requires = "wave")]
    pub dry_run: bool,
}

/// Snapshot inputs and report output of one `report` run.
#[derive(Debug, PartialEq, Eq)]
struct ReportPaths {
    before_source: PathBuf,
    after_target: PathBuf,
    after_source: PathBuf,
    output: PathBuf,
}

impl ReportPaths {
    fn resolve(args: &ReportArgs, config: &MigrationConfig) -> Result<Self, ExError> {
        match (args.wave, args.paths.as_slice()) {
            (Some(wave), [output]) => {
                let dir = config.snapshot_dir.as_path();
                Ok(Self {
                    before_source: Stage::BeforeSource.snapshot_path(dir, wave, args.dry_run),
                    after_target: Stage::AfterTarget.snapshot_path(dir, wave, args.dry_run),
                    after_source: Stage::AfterSource.snapshot_path(dir, wave, args.dry_run),
                    output: output.clone(),
                })
            }
            (None, [before_source, after_target, after_source, output]) => Ok(Self {
                before_source: before_source.clone(),
                after_target: after_target.clone(),
                after_source: after_source.clone(),
                output: output.clone(),
            }),
            (Some(_), paths) => Err(invalid_input(format!(
                "--wave takes only the output path, got {} paths",
                paths.len()
            ))),
            (None, paths) => Err(invalid_input(format!(
                "expected <before-source> <after-target> <after-source> <output> or --wave N <output>, got {} paths",
                paths.len()
            ))),
        }
    }
}

fn invalid_input(message: String) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("report")
        .with_message(message)
}

pub fn execute(args: ReportArgs, config: &MigrationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let paths = ReportPaths::resolve(&args, config)?;
    tracing::info!(
        before_source = %paths.before_source.display(),
        after_target = %paths.after_target.display(),
        after_source = %paths.after_source.display(),
        "building migration report"
    );

    let report = compare_files(
        &paths.before_source,
        &paths.after_target,
        Some(&paths.after_source),
        config.to_diff_options(),
    )?;
    report.write_csv_path(&paths.output)?;

    let stats = report.stats();
    println!(
        "{} discrepancies in {} of {} matched repositories ({} not found in target) written to {}",
        report.len(),
        stats.changed_rows,
        stats.matched_rows,
        stats.unmatched_baseline_rows,
        paths.output.display()
    );
    Ok(())
}
