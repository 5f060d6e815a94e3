//! GEI log parsing.
//!
//! GEI writes one `README.md` per organization migration and one log file per
//! repository under `success/` or `failure/`. Only lines starting with `[`
//! are log entries; each begins with a bracketed UTC timestamp such as
//! `[2024-04-12T01:25:50Z]`.

use crate::errors::{ExError, MigrateError, Result};
use crate::migration_log::model::{
    FindingLevel, LogFinding, OrgMigrationTiming, Outcome, RepoLogAnalysis, RepoMigrationTiming,
};
use crate::{log_op_end, log_op_error, log_op_start};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::Path;
use std::time::Instant;

/// File holding the organization-level log.
pub const ORG_LOG_FILE: &str = "README.md";

pub const ORG_START_MARKER: &str = "Organization migration started";
pub const ORG_END_MARKER: &str = "Organization migration completed";
pub const REPO_START_MARKER: &str = "Migration started";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Read org-level timing from `<dir>/README.md`.
///
/// # Errors
///
/// - `Io`: the file cannot be read
/// - `InvalidLog`: a marker line is absent or its timestamp is malformed
pub fn parse_org_log(org: &str, dir: &Path) -> Result<OrgMigrationTiming> {
    let path = dir.join(ORG_LOG_FILE);
    let text = std::fs::read_to_string(&path)
        .map_err(|e| ExError::from(e).with_op("parse_org_log").with_path(&path))?;
    parse_org_log_text(org, &text, &path.display().to_string())
}

/// Org-level timing from log text. `log` labels the source in errors.
///
/// # Errors
///
/// - `InvalidLog`: a marker line is absent or its timestamp is malformed
pub fn parse_org_log_text(org: &str, text: &str, log: &str) -> Result<OrgMigrationTiming> {
    let lines = entries(text);
    let start_time = marker_time(log, &lines, ORG_START_MARKER)?;
    let end_time = marker_time(log, &lines, ORG_END_MARKER)?;
    Ok(OrgMigrationTiming {
        org: org.to_string(),
        start_time,
        end_time,
        duration_mins: whole_minutes(start_time, end_time),
    })
}

/// Parse one repository log.
///
/// Findings are all `WARN` lines in file order, then all `ERROR` lines.
///
/// # Errors
///
/// - `InvalidLog`: not exactly one start line, no end line for `outcome`, or
///   a malformed timestamp
pub fn parse_repo_log(
    org: &str,
    repo: &str,
    outcome: Outcome,
    text: &str,
) -> Result<(RepoMigrationTiming, Vec<LogFinding>)> {
    let lines = entries(text);

    let starts = lines
        .iter()
        .filter(|l| l.contains(REPO_START_MARKER))
        .count();
    if starts != 1 {
        return Err(match starts {
            0 => MigrateError::MissingLogMarker {
                log: repo.to_string(),
                marker: REPO_START_MARKER.to_string(),
            },
            count => MigrateError::DuplicateLogMarker {
                log: repo.to_string(),
                marker: REPO_START_MARKER.to_string(),
                count,
            },
        }
        .into());
    }

    let start_time = marker_time(repo, &lines, REPO_START_MARKER)?;
    let end_time = marker_time(repo, &lines, outcome.end_marker())?;
    let timing = RepoMigrationTiming {
        org: org.to_string(),
        repo: repo.to_string(),
        outcome,
        start_time,
        end_time,
        duration_mins: whole_minutes(start_time, end_time),
    };

    let mut findings = Vec::new();
    for level in [FindingLevel::Warn, FindingLevel::Error] {
        findings.extend(
            lines
                .iter()
                .filter(|l| l.contains(level.as_str()))
                .map(|l| LogFinding {
                    org: org.to_string(),
                    repo: repo.to_string(),
                    level,
                    message: l.trim().to_string(),
                }),
        );
    }

    Ok((timing, findings))
}

/// Parse every repository log under `<dir>/success` and `<dir>/failure`.
///
/// Files are processed in file-name order. A missing subdirectory contributes
/// nothing.
///
/// # Errors
///
/// - `Io`: a directory or file cannot be read
/// - `InvalidLog`: see [`parse_repo_log`]; the error names the file
pub fn parse_repo_logs(org: &str, dir: &Path) -> Result<RepoLogAnalysis> {
    let start = Instant::now();
    let path_str = dir.display().to_string();
    log_op_start!("parse_repo_logs", org = org, path = %path_str);

    let result = collect_repo_logs(org, dir);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(analysis) => {
            log_op_end!(
                "parse_repo_logs",
                duration_ms = duration_ms,
                rows = analysis.timings.len(),
                findings = analysis.findings.len()
            );
        }
        Err(e) => log_op_error!("parse_repo_logs", e.clone(), duration_ms = duration_ms),
    }
    result.map_err(|e| e.with_op("parse_repo_logs"))
}

fn collect_repo_logs(org: &str, dir: &Path) -> Result<RepoLogAnalysis> {
    let mut analysis = RepoLogAnalysis::default();

    for outcome in Outcome::ALL {
        let sub = dir.join(outcome.as_str());
        if !sub.is_dir() {
            tracing::debug!(path = %sub.display(), "no {} logs", outcome);
            continue;
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&sub).map_err(|e| ExError::from(e).with_path(&sub))? {
            let entry = entry.map_err(|e| ExError::from(e).with_path(&sub))?;
            if entry.path().is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        for path in files {
            let repo = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ExError::from(e).with_path(&path))?;
            let (timing, findings) = parse_repo_log(org, &repo, outcome, &text)
                .map_err(|e| e.with_path(&path).with_repo(repo.as_str()))?;
            analysis.timings.push(timing);
            analysis.findings.extend(findings);
        }
    }

    Ok(analysis)
}

/// Log entries: lines starting with `[`.
fn entries(text: &str) -> Vec<&str> {
    text.lines().filter(|l| l.starts_with('[')).collect()
}

/// Timestamp of the first entry containing `marker`.
fn marker_time(log: &str, lines: &[&str], marker: &str) -> Result<DateTime<Utc>> {
    let line = lines
        .iter()
        .find(|l| l.contains(marker))
        .ok_or_else(|| MigrateError::MissingLogMarker {
            log: log.to_string(),
            marker: marker.to_string(),
        })?;
    let token = line.split_whitespace().next().unwrap_or_default();
    parse_log_timestamp(token).ok_or_else(|| {
        MigrateError::InvalidLogTimestamp {
            log: log.to_string(),
            value: token.to_string(),
        }
        .into()
    })
}

/// Parse a bracketed GEI timestamp token like `[2024-04-12T01:25:50Z]`.
pub fn parse_log_timestamp(token: &str) -> Option<DateTime<Utc>> {
    let inner = token.strip_prefix('[')?.strip_suffix(']')?;
    NaiveDateTime::parse_from_str(inner, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn whole_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds() / 60
}
