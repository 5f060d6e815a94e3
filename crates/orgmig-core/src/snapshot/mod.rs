//! Repository inventory snapshots.
//!
//! A snapshot is one organization's repository inventory captured at one
//! pipeline stage (`before-source`, `after-target`, ...). Snapshots are
//! produced by an external collector as CSV files and are immutable once
//! loaded.
//!
//! ## Responsibilities
//!
//! - Typed model of a snapshot and its repository records
//! - Loading CSV snapshots (missing-value detection, volatile-field removal,
//!   date views, duplicate-key policy)
//! - Canonical stage naming for snapshot files
//!
//! ## Non-Responsibilities
//!
//! - Fetching inventories from the GitHub API (external collector)
//! - Comparing snapshots (see [`crate::diff`])

pub mod fields;
pub mod loader;
pub mod model;
pub mod stage;

pub use loader::{load_snapshot, load_snapshot_as, read_snapshot};
pub use model::{FieldValue, RepoRecord, Snapshot};
pub use stage::Stage;
