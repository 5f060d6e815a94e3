//! Canonical schema constants for structured logging
//!
//! These constants keep event field names consistent between the core
//! library, the CLI and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Inventory identifiers
pub const FIELD_STAGE: &str = "stage";
pub const FIELD_REPO: &str = "repo";
pub const FIELD_COLUMN: &str = "column";
pub const FIELD_ORG: &str = "org";
pub const FIELD_PATH: &str = "path";

// Collection sizes
pub const FIELD_ROWS: &str = "rows";
pub const FIELD_DUPLICATES: &str = "duplicates";
pub const FIELD_DISCREPANCIES: &str = "discrepancies";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
