//! Structured logging for orgmig runs
//!
//! All diagnostics go to stderr through `tracing`, so stdout stays free for
//! reports piped out of `orgmig diff`. The CLI installs the subscriber once
//! with [`init`]; `--log-format json` selects [`Profile::Production`].
//!
//! Events carry the canonical keys from [`crate::schema`]: `component`,
//! `op`, `event` and `duration_ms` on every boundary event, plus
//! operation-specific fields such as `path`, `stage`, `rows`, `duplicates`
//! and `discrepancies`. Failures add `err.kind` and `err.code`.
//!
//! ```rust
//! use orgmig_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Tests install [`init_test_capture`] instead and assert on the recorded
//! [`CapturedEvent`]s.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
