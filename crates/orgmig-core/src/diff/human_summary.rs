//! Human-readable summary renderer for diff reports.

use crate::diff::report::DiffReport;

/// Render a Markdown summary of a [`DiffReport`].
///
/// Intended for pasting into wave sign-off notes. It is informational only;
/// the CSV report stays the source of truth.
pub fn render_human_summary(report: &DiffReport) -> String {
    let mut out = String::new();
    let stats = report.stats();

    out.push_str("## Migration Diff\n\n");

    out.push_str("| Rows | Count |\n|---|---|\n");
    let rows = [
        ("Baseline repositories", stats.baseline_rows),
        ("Matched in candidate", stats.matched_rows),
        ("Missing from candidate", stats.unmatched_baseline_rows),
        ("Only in candidate", stats.candidate_only_rows),
        ("Unchanged", stats.unchanged_rows),
        ("With discrepancies", stats.changed_rows),
    ];
    for (label, count) in rows {
        out.push_str(&format!("| {label} | {count} |\n"));
    }
    if stats.unkeyed_baseline_rows > 0 {
        out.push_str(&format!(
            "| Without a key | {} |\n",
            stats.unkeyed_baseline_rows
        ));
    }
    out.push('\n');

    if report.is_empty() {
        out.push_str("_No discrepancies detected._\n");
        return out;
    }

    out.push_str(&format!(
        "**Discrepancies**: {}\n\n",
        report.len()
    ));

    out.push_str("### By Column\n\n");
    for (column, count) in report.counts_by_column() {
        out.push_str(&format!("- `{column}`: {count}\n"));
    }
    out.push('\n');

    out.push_str("### By Repository\n\n");
    for (repo, count) in report.counts_by_repo() {
        out.push_str(&format!("- **{repo}**: {count}\n"));
    }
    out.push('\n');

    out.push_str("### Details\n\n");
    out.push_str("| Repository | Column | Before | After | Context |\n|---|---|---|---|---|\n");
    for d in report {
        out.push_str(&format!(
            "| {} | `{}` | {} | {} | {} |\n",
            d.source_repo_id,
            d.field_name,
            cell(d.baseline_value.as_text()),
            cell(d.candidate_value.as_text()),
            cell(d.context_value.as_text()),
        ));
    }

    out
}

fn cell(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("`{}`", v.replace('|', "\\|")),
        None => "_missing_".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{DiffStats, FieldDiscrepancy};
    use crate::snapshot::FieldValue;

    #[test]
    fn test_empty_report_says_no_discrepancies() {
        let summary = render_human_summary(&DiffReport::default());
        assert!(summary.starts_with("## Migration Diff"));
        assert!(summary.contains("_No discrepancies detected._"));
        assert!(!summary.contains("### By Column"));
    }

    #[test]
    fn test_lists_columns_and_repos() {
        let report = DiffReport::new(
            vec![FieldDiscrepancy {
                source_repo_id: "acme/r1".to_string(),
                target_repo_id: "acme-emu/r1".to_string(),
                field_name: "isArchived".to_string(),
                baseline_value: FieldValue::text("True"),
                candidate_value: FieldValue::text("False"),
                context_value: FieldValue::Missing,
                baseline_collected_at: FieldValue::Missing,
                candidate_collected_at: FieldValue::Missing,
                context_collected_at: FieldValue::Missing,
            }],
            DiffStats {
                baseline_rows: 1,
                matched_rows: 1,
                changed_rows: 1,
                ..DiffStats::default()
            },
        );
        let summary = render_human_summary(&report);
        assert!(summary.contains("- `isArchived`: 1"));
        assert!(summary.contains("- **acme/r1**: 1"));
        assert!(summary.contains("| acme/r1 | `isArchived` | `True` | `False` | _missing_ |"));
        assert!(summary.contains("| With discrepancies | 1 |"));
    }
}
