//! Operation boundary macros
//!
//! Every orgmig operation (`load_snapshot`, `compare`, `write_report`,
//! `parse_repo_logs`) is bracketed by exactly one `start` event and one
//! `end` or `end_error` event. Extra `key = value` fields follow the usual
//! `tracing` syntax, including `%` and `?` sigils.

/// Emit the `start` event of an operation
///
/// # Example
///
/// ```
/// # use orgmig_core::log_op_start;
/// let path = "before-source-wave-1.csv";
/// log_op_start!("load_snapshot");
/// log_op_start!("load_snapshot", path = %path, stage = "before-source");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Emit the `end` event of an operation; `duration_ms` is mandatory
///
/// # Example
///
/// ```
/// # use orgmig_core::log_op_end;
/// log_op_end!("compare", duration_ms = 42);
/// log_op_end!("compare", duration_ms = 42, discrepancies = 3, rows = 10);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Emit the `end_error` event of an operation with the error's kind and code
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError),
/// so a [`MigrateError`](crate::errors::MigrateError) can be passed as is.
///
/// # Example
///
/// ```
/// # use orgmig_core::log_op_error;
/// # use orgmig_core::errors::MigrateError;
/// let err = MigrateError::EmptySnapshot { snapshot: "a.csv".to_string() };
/// log_op_error!("load_snapshot", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)*)?
        );
    }};
}
