//! Snapshot diff command

use clap::{Args, ValueEnum};
use orgmig_core::diff::render_human_summary;
use orgmig_core::{load_snapshot, DiffEngine, DiffOptions, DiffReport, MigrationConfig};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Discrepancy table (workbook format)
    Csv,
    /// Discrepancies plus row statistics
    Json,
    /// Markdown summary
    Summary,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Baseline snapshot CSV (drives the comparison)
    pub baseline: PathBuf,

    /// Candidate snapshot CSV
    pub candidate: PathBuf,

    /// Context snapshot CSV used only to annotate discrepancies
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Key column joining baseline and candidate rows (overrides config)
    #[arg(long)]
    pub key: Option<String>,
}

pub fn execute(args: DiffArgs, config: &MigrationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = config.to_diff_options();
    if let Some(key) = args.key {
        options = options.with_key_field(key);
    }

    let report = compare_files(
        &args.baseline,
        &args.candidate,
        args.context.as_deref(),
        options,
    )?;

    match args.output {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            render(&report, args.format, file)?;
            eprintln!(
                "{} discrepancies across {} repositories written to {}",
                report.len(),
                report.stats().changed_rows,
                path.display()
            );
        }
        None => render(&report, args.format, std::io::stdout().lock())?,
    }
    Ok(())
}

pub(crate) fn render<W: Write>(
    report: &DiffReport,
    format: OutputFormat,
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => report.write_csv(writer)?,
        OutputFormat::Json => {
            report.write_json(&mut writer)?;
            writeln!(writer)?;
        }
        OutputFormat::Summary => writer.write_all(render_human_summary(report).as_bytes())?,
    }
    Ok(())
}

/// Load the snapshot files and compare them; shared with the `report` command.
pub(crate) fn compare_files(
    baseline: &Path,
    candidate: &Path,
    context: Option<&Path>,
    options: DiffOptions,
) -> Result<DiffReport, Box<dyn std::error::Error>> {
    let baseline = load_snapshot(baseline)?;
    let candidate = load_snapshot(candidate)?;
    let context = context.map(load_snapshot).transpose()?;
    Ok(DiffEngine::new(options).compare(&baseline, &candidate, context.as_ref())?)
}
