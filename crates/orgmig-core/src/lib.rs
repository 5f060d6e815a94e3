//! orgmig core - GitHub organization migration verification
//!
//! This crate provides the pieces used to check that an organization
//! migration preserved repository settings:
//! - Snapshot model and CSV loader for repository inventories
//! - Baseline-driven diff engine with missing-value and case-folding semantics
//! - Discrepancy reports (CSV, JSON, Markdown summary)
//! - GitHub Enterprise Importer log analysis (timing, warnings, errors)
//! - Layered configuration, error and logging facilities

pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod migration_log;
pub mod snapshot;

/// Canonical log field keys, re-exported for the logging macros.
pub use orgmig_core_types::schema;

// Re-export commonly used types
pub use config::MigrationConfig;
pub use diff::{DiffEngine, DiffOptions, DiffReport, FieldDiscrepancy};
pub use errors::{ExError, ExErrorKind, MigrateError, Result};
pub use snapshot::{load_snapshot, FieldValue, RepoRecord, Snapshot, Stage};
