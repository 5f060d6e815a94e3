use std::path::Path;
use thiserror::Error;

/// Result type alias using the canonical ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by orgmig maps to exactly one kind, and each kind
/// maps to a stable `ERR_*` code that scripts wrapping the CLI can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Snapshot input
    /// A snapshot lacks its identity column, has no header, or is not tabular
    MalformedSnapshot,

    // Migration logs
    /// A GEI migration log lacks its start/end markers or has a bad timestamp
    InvalidLog,

    // Configuration
    /// Config file unreadable, not valid TOML, or semantically invalid
    InvalidConfig,
    /// A CLI argument combination that cannot be resolved
    InvalidInput,

    // Integration/IO
    /// Filesystem failure, including a missing input file
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MalformedSnapshot => "ERR_MALFORMED_SNAPSHOT",
            ExErrorKind::InvalidLog => "ERR_INVALID_LOG",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// (operation, file, repo, column) needed to find the offending input.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    repo: Option<String>,
    column: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            repo: None,
            column: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }

    /// Add repository context
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the repository context, if any
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// Get the column context, if any
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(repo) = &self.repo {
            write!(f, " (repo: {})", repo)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

impl From<std::io::Error> for ExError {
    fn from(err: std::io::Error) -> Self {
        ExError::new(ExErrorKind::Io).with_message(err.to_string())
    }
}

impl From<csv::Error> for ExError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => ExError::new(ExErrorKind::Io).with_message(err.to_string()),
            csv::ErrorKind::Serialize(_) => {
                ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
            }
            _ => ExError::new(ExErrorKind::MalformedSnapshot).with_message(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for migration tooling
///
/// These variants describe *what* went wrong in domain terms; they convert
/// into the canonical [`ExError`] at module boundaries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    // ===== Snapshot Errors =====
    /// Identity (or configured key) column absent from a snapshot header
    #[error("Snapshot {snapshot} has no `{column}` column")]
    MissingKeyColumn { snapshot: String, column: String },

    /// Snapshot has no header row at all
    #[error("Snapshot {snapshot} is empty or has no header row")]
    EmptySnapshot { snapshot: String },

    /// Snapshot is not tabular
    #[error("Snapshot {snapshot} is not a valid table: {reason}")]
    NotTabular { snapshot: String, reason: String },

    /// Snapshot file does not exist
    #[error("Snapshot file not found: {path}")]
    SnapshotNotFound { path: String },

    // ===== Migration Log Errors =====
    /// Required marker line absent from a GEI log
    #[error("Log {log} has no line containing `{marker}`")]
    MissingLogMarker { log: String, marker: String },

    /// More than one start marker in a repository log
    #[error("Log {log} has {count} lines containing `{marker}`, expected exactly one")]
    DuplicateLogMarker {
        log: String,
        marker: String,
        count: usize,
    },

    /// Timestamp token on a marker line could not be parsed
    #[error("Log {log} has an invalid timestamp `{value}`")]
    InvalidLogTimestamp { log: String, value: String },

    // ===== Config Errors =====
    /// Config file could not be parsed
    #[error("Invalid config {path}: {reason}")]
    InvalidConfig { path: String, reason: String },
}

/// Conversion from MigrateError to ExError
impl From<MigrateError> for ExError {
    fn from(err: MigrateError) -> Self {
        let message = err.to_string();
        match err {
            MigrateError::MissingKeyColumn { snapshot, column } => {
                ExError::new(ExErrorKind::MalformedSnapshot)
                    .with_path(snapshot)
                    .with_column(column)
                    .with_message(message)
            }
            MigrateError::EmptySnapshot { snapshot }
            | MigrateError::NotTabular { snapshot, .. } => {
                ExError::new(ExErrorKind::MalformedSnapshot)
                    .with_path(snapshot)
                    .with_message(message)
            }
            MigrateError::SnapshotNotFound { path } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(message),
            MigrateError::MissingLogMarker { log, .. }
            | MigrateError::DuplicateLogMarker { log, .. }
            | MigrateError::InvalidLogTimestamp { log, .. } => {
                ExError::new(ExErrorKind::InvalidLog)
                    .with_path(log)
                    .with_message(message)
            }
            MigrateError::InvalidConfig { path, .. } => ExError::new(ExErrorKind::InvalidConfig)
                .with_path(path)
                .with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::MalformedSnapshot)
            .with_op("load_snapshot")
            .with_path("before-source.csv")
            .with_message("no header");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_MALFORMED_SNAPSHOT]"));
        assert!(rendered.contains("load_snapshot"));
        assert!(rendered.contains("before-source.csv"));
    }

    #[test]
    fn test_io_errors_map_to_io() {
        for kind in [std::io::ErrorKind::NotFound, std::io::ErrorKind::PermissionDenied] {
            let err: ExError = std::io::Error::new(kind, "nope").into();
            assert_eq!(err.kind(), ExErrorKind::Io);
        }
    }

    #[test]
    fn test_snapshot_not_found_names_path() {
        let err: ExError = MigrateError::SnapshotNotFound {
            path: "before-source-wave-1.csv".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.path(), Some("before-source-wave-1.csv"));
        assert!(err.to_string().contains("before-source-wave-1.csv"));
    }
}
