//! CSV output for log analysis results.

use crate::errors::{ExError, Result};
use crate::migration_log::model::{
    LogFinding, RepoLogAnalysis, RepoMigrationTiming, FINDING_COLUMNS, TIMING_COLUMNS,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write the timing table; the header is always present.
///
/// # Errors
///
/// - `Io` / `Serialization`: the writer failed
pub fn write_timing_csv<W: Write>(timings: &[RepoMigrationTiming], writer: W) -> Result<()> {
    write_table(&TIMING_COLUMNS, timings, writer)
}

/// Write the findings table; the header is always present.
///
/// # Errors
///
/// - `Io` / `Serialization`: the writer failed
pub fn write_findings_csv<W: Write>(findings: &[LogFinding], writer: W) -> Result<()> {
    write_table(&FINDING_COLUMNS, findings, writer)
}

fn write_table<T: Serialize, W: Write>(header: &[&str], rows: &[T], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(header)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// File names of the two tables for `org`.
pub fn output_paths(output_dir: &Path, org: &str) -> (PathBuf, PathBuf) {
    (
        output_dir.join(format!("{org}_timing_results.csv")),
        output_dir.join(format!("{org}_results.csv")),
    )
}

/// Write both tables into `output_dir`, returning (timing, findings) paths.
///
/// # Errors
///
/// - `Io`: the directory or a file could not be created
/// - `Serialization`: a row could not be encoded
pub fn write_analysis(
    output_dir: &Path,
    org: &str,
    analysis: &RepoLogAnalysis,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| ExError::from(e).with_op("write_analysis").with_path(output_dir))?;

    let (timing_path, findings_path) = output_paths(output_dir, org);
    let create = |path: &Path| {
        std::fs::File::create(path)
            .map_err(|e| ExError::from(e).with_op("write_analysis").with_path(path))
    };

    write_timing_csv(&analysis.timings, create(timing_path.as_path())?)
        .map_err(|e| e.with_path(&timing_path))?;
    write_findings_csv(&analysis.findings, create(findings_path.as_path())?)
        .map_err(|e| e.with_path(&findings_path))?;

    tracing::info!(
        org = org,
        rows = analysis.timings.len(),
        findings = analysis.findings.len(),
        timing = %timing_path.display(),
        results = %findings_path.display(),
        "wrote log analysis"
    );
    Ok((timing_path, findings_path))
}
