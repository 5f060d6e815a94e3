//! Snapshot diff engine.
//!
//! Compares a baseline repository inventory with a candidate one (usually the
//! source org before migration against the target org after it) and lists
//! every field that did not survive the move.
//!
//! ## Entry point
//!
//! ```ignore
//! use orgmig_core::diff::{DiffEngine, DiffOptions};
//!
//! let report = DiffEngine::new(DiffOptions::default())
//!     .compare(&before_source, &after_target, Some(&after_source))?;
//! report.write_csv(std::io::stdout())?;
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: output follows baseline row order, then baseline column order.
//! - **Volatile-field suppression**: timestamps, URLs and activity counters that
//!   change on every collection are never compared.
//! - **Baseline-driven**: repos present only in the candidate are counted in
//!   [`DiffStats`] but never reported as discrepancies.
//! - **Column isolation**: a column absent from one side compares as missing;
//!   no single column can abort the report.

pub mod comparator;
pub mod engine;
pub mod human_summary;
pub mod model;
pub mod report;

pub use comparator::{values_differ, FieldComparator};
pub use engine::{compare, DiffEngine};
pub use human_summary::render_human_summary;
pub use model::{DiffOptions, DiffStats, FieldDiscrepancy, REPORT_COLUMNS};
pub use report::DiffReport;
