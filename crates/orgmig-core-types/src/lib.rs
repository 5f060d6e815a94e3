//! Core types shared across orgmig facilities
//!
//! This crate provides foundational types used by the error, logging and
//! configuration facilities:
//!
//! - **Correlation types**: RunId tagging every event of one invocation
//! - **Sensitive data**: Sensitive<T> marker for access-token redaction
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
