pub mod config;
pub mod diff;
pub mod logs;
pub mod report;
