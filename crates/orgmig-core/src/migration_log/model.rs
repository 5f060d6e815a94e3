//! Migration log analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order of the timing table.
pub const TIMING_COLUMNS: [&str; 6] = [
    "org",
    "repo",
    "outcome",
    "start_time",
    "end_time",
    "duration_mins",
];

/// Column order of the findings table.
pub const FINDING_COLUMNS: [&str; 4] = ["org", "repo", "type", "message"];

/// How a repository migration ended; also names the log subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Success, Outcome::Failure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }

    /// Marker of the line that closes a log with this outcome.
    pub fn end_marker(&self) -> &'static str {
        match self {
            Outcome::Success => "Migration complete",
            Outcome::Failure => "Migration failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a flagged log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FindingLevel {
    Warn,
    Error,
}

impl FindingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingLevel::Warn => "WARN",
            FindingLevel::Error => "ERROR",
        }
    }
}

/// Start and end of the whole organization migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMigrationTiming {
    pub org: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_mins: i64,
}

/// One repository migration, as read from its GEI log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMigrationTiming {
    pub org: String,
    /// Log file name
    pub repo: String,
    pub outcome: Outcome,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Whole minutes, truncated
    pub duration_mins: i64,
}

/// A `WARN` or `ERROR` line from a repository log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFinding {
    pub org: String,
    pub repo: String,
    #[serde(rename = "type")]
    pub level: FindingLevel,
    /// The full log line, trimmed
    pub message: String,
}

/// Everything read from one org's `success/` and `failure/` directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLogAnalysis {
    pub timings: Vec<RepoMigrationTiming>,
    pub findings: Vec<LogFinding>,
}

impl RepoLogAnalysis {
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty() && self.findings.is_empty()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.timings.iter().filter(|t| t.outcome == outcome).count()
    }

    pub fn count_findings(&self, level: FindingLevel) -> usize {
        self.findings.iter().filter(|f| f.level == level).count()
    }
}
