//! GitHub Enterprise Importer log analysis.
//!
//! Extracts per-organization and per-repository migration timing plus every
//! `WARN`/`ERROR` entry from a GEI output directory laid out as:
//!
//! ```text
//! <dir>/README.md          organization log
//! <dir>/success/<repo>     one log per migrated repository
//! <dir>/failure/<repo>     one log per failed repository
//! ```

pub mod model;
pub mod parser;
pub mod writer;

pub use model::{
    FindingLevel, LogFinding, OrgMigrationTiming, Outcome, RepoLogAnalysis, RepoMigrationTiming,
};
pub use parser::{parse_org_log, parse_repo_log, parse_repo_logs};
pub use writer::{write_analysis, write_findings_csv, write_timing_csv};
