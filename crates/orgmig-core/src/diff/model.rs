//! Diff engine input options and output types.

use crate::diff::comparator::FieldComparator;
use crate::snapshot::{fields, FieldValue};
use serde::{Deserialize, Serialize};

/// Fixed column order of the tabular report.
pub const REPORT_COLUMNS: [&str; 9] = [
    "source_name",
    "target_name",
    "column",
    "source_value",
    "target_value",
    "context_value",
    "source_date",
    "target_date",
    "context_date",
];

/// Knobs for one `compare` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Column joining baseline and candidate rows (exact, case-sensitive match)
    pub key_field: String,
    /// Columns never compared because they change between collection runs
    pub excluded_fields: Vec<String>,
    /// Columns used only to identify/display a repo; never compared.
    /// The key field is always treated as one.
    pub identity_fields: Vec<String>,
    /// Value equality semantics
    pub comparator: FieldComparator,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            key_field: fields::NAME.to_string(),
            excluded_fields: fields::EXCLUDED_FIELDS.iter().map(|f| f.to_string()).collect(),
            identity_fields: vec![fields::OWNER_LOGIN.to_string()],
            comparator: FieldComparator::default(),
        }
    }
}

impl DiffOptions {
    /// Options with a non-default key field.
    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// Add columns to the excluded set.
    pub fn exclude<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in extra {
            let field = field.into();
            if !self.excluded_fields.contains(&field) {
                self.excluded_fields.push(field);
            }
        }
        self
    }

    /// True if `column` takes part in value comparison.
    pub fn is_compared(&self, column: &str) -> bool {
        column != self.key_field
            && !self.identity_fields.iter().any(|f| f == column)
            && !self.excluded_fields.iter().any(|f| f == column)
    }
}

/// One (repo, field) pair where baseline and candidate disagree.
///
/// Serde names match [`REPORT_COLUMNS`], so the struct is also the report's
/// row type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiscrepancy {
    /// `owner/name` from the baseline row
    #[serde(rename = "source_name")]
    pub source_repo_id: String,
    /// `owner/name` from the candidate row
    #[serde(rename = "target_name")]
    pub target_repo_id: String,
    #[serde(rename = "column")]
    pub field_name: String,
    #[serde(rename = "source_value")]
    pub baseline_value: FieldValue,
    #[serde(rename = "target_value")]
    pub candidate_value: FieldValue,
    /// Same field in the context snapshot; informational only
    pub context_value: FieldValue,
    #[serde(rename = "source_date")]
    pub baseline_collected_at: FieldValue,
    #[serde(rename = "target_date")]
    pub candidate_collected_at: FieldValue,
    #[serde(rename = "context_date")]
    pub context_collected_at: FieldValue,
}

/// Row accounting for one `compare` call.
///
/// Informational only: none of these counts turns into a discrepancy row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Rows in the baseline snapshot
    pub baseline_rows: usize,
    /// Baseline rows with a candidate counterpart
    pub matched_rows: usize,
    /// Baseline rows with no candidate counterpart (not migrated, or renamed)
    pub unmatched_baseline_rows: usize,
    /// Baseline rows without a key value
    pub unkeyed_baseline_rows: usize,
    /// Candidate rows with no baseline counterpart (never visited)
    pub candidate_only_rows: usize,
    /// Matched rows without any discrepancy
    pub unchanged_rows: usize,
    /// Matched rows with at least one discrepancy
    pub changed_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_skip_identity_and_volatile_columns() {
        let options = DiffOptions::default();
        assert!(!options.is_compared("name"));
        assert!(!options.is_compared("owner.login"));
        assert!(!options.is_compared("pushedAt"));
        assert!(!options.is_compared("Inventoried"));
        assert!(options.is_compared("visibility"));
        assert!(options.is_compared("some.future.field"));
    }

    #[test]
    fn test_custom_key_field_is_not_compared() {
        let options = DiffOptions::default().with_key_field("id");
        assert!(!options.is_compared("id"));
        assert!(options.is_compared("name"));
    }

    #[test]
    fn test_exclude_is_idempotent() {
        let options = DiffOptions::default().exclude(["diskUsage", "diskUsage"]);
        let count = options
            .excluded_fields
            .iter()
            .filter(|f| *f == "diskUsage")
            .count();
        assert_eq!(count, 1);
        assert!(!options.is_compared("diskUsage"));
    }
}
