//! Snapshot diff computation engine.
//!
//! The core entry point is [`DiffEngine::compare`], which walks a baseline
//! snapshot row by row and reports every retained field whose candidate value
//! differs.

use crate::diff::model::{DiffOptions, DiffStats, FieldDiscrepancy};
use crate::diff::report::DiffReport;
use crate::errors::{MigrateError, Result};
use crate::snapshot::{FieldValue, RepoRecord, Snapshot};
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Baseline-driven snapshot comparator.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare `candidate` against `baseline`, annotating each discrepancy
    /// with the matching `context` value.
    ///
    /// Discrepancies come out in baseline row order, then baseline column
    /// order. Baseline rows without a candidate counterpart, and candidate
    /// rows without a baseline counterpart, only show up in [`DiffStats`].
    ///
    /// # Errors
    ///
    /// - `MalformedSnapshot`: the key field is not a column of one of the
    ///   given non-empty snapshots
    pub fn compare(
        &self,
        baseline: &Snapshot,
        candidate: &Snapshot,
        context: Option<&Snapshot>,
    ) -> Result<DiffReport> {
        let start = Instant::now();
        log_op_start!(
            "compare",
            stage = baseline.stage().as_str(),
            rows = baseline.len()
        );

        let result = self.compare_inner(baseline, candidate, context);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                log_op_end!(
                    "compare",
                    duration_ms = duration_ms,
                    discrepancies = report.len(),
                    rows = report.stats().matched_rows
                );
            }
            Err(e) => log_op_error!("compare", e.clone(), duration_ms = duration_ms),
        }
        result.map_err(|e| e.with_op("compare"))
    }

    fn compare_inner(
        &self,
        baseline: &Snapshot,
        candidate: &Snapshot,
        context: Option<&Snapshot>,
    ) -> Result<DiffReport> {
        let key_field = self.options.key_field.as_str();
        for snapshot in [Some(baseline), Some(candidate), context].into_iter().flatten() {
            self.require_key_column(snapshot)?;
        }

        let candidate_index = candidate.index_by(key_field);
        let context_index = context.map(|c| c.index_by(key_field)).unwrap_or_default();

        let mut stats = DiffStats {
            baseline_rows: baseline.len(),
            ..DiffStats::default()
        };
        let mut discrepancies = Vec::new();

        for row in baseline.records() {
            let Some(key) = row.key(key_field) else {
                stats.unkeyed_baseline_rows += 1;
                continue;
            };
            let Some(target) = candidate_index.get(key) else {
                tracing::debug!(repo = key, "no candidate row, skipping");
                stats.unmatched_baseline_rows += 1;
                continue;
            };
            stats.matched_rows += 1;

            if row.fields().eq(target.fields()) {
                stats.unchanged_rows += 1;
                continue;
            }

            let before = discrepancies.len();
            self.compare_row(row, target, context_index.get(key).copied(), &mut discrepancies);
            if discrepancies.len() == before {
                stats.unchanged_rows += 1;
            } else {
                stats.changed_rows += 1;
            }
        }

        let baseline_keys = baseline.index_by(key_field);
        stats.candidate_only_rows = candidate_index
            .keys()
            .filter(|k| !baseline_keys.contains_key(*k))
            .count();

        Ok(DiffReport::new(discrepancies, stats))
    }

    fn compare_row(
        &self,
        row: &RepoRecord,
        target: &RepoRecord,
        context: Option<&RepoRecord>,
        out: &mut Vec<FieldDiscrepancy>,
    ) {
        let key_field = self.options.key_field.as_str();
        let comparator = &self.options.comparator;

        for (column, value) in row.fields() {
            if !self.options.is_compared(column) {
                continue;
            }
            let target_value = target.value(column);
            if !comparator.values_differ(value, target_value) {
                continue;
            }
            out.push(FieldDiscrepancy {
                source_repo_id: row.display_id(key_field),
                target_repo_id: target.display_id(key_field),
                field_name: column.to_string(),
                baseline_value: value.clone(),
                candidate_value: target_value.clone(),
                context_value: context
                    .map(|c| c.value(column).clone())
                    .unwrap_or(FieldValue::Missing),
                baseline_collected_at: row.collected_at().clone(),
                candidate_collected_at: target.collected_at().clone(),
                context_collected_at: context
                    .map(|c| c.collected_at().clone())
                    .unwrap_or(FieldValue::Missing),
            });
        }
    }

    /// A snapshot without rows has nothing to join, so it passes whatever
    /// its columns are.
    fn require_key_column(&self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.is_empty() || snapshot.has_column(&self.options.key_field) {
            return Ok(());
        }
        Err(MigrateError::MissingKeyColumn {
            snapshot: snapshot.source().to_string(),
            column: self.options.key_field.clone(),
        }
        .into())
    }
}

/// Compare two snapshots with default options and the given key field.
///
/// # Errors
///
/// See [`DiffEngine::compare`].
pub fn compare(
    baseline: &Snapshot,
    candidate: &Snapshot,
    context: Option<&Snapshot>,
    key_field: &str,
) -> Result<DiffReport> {
    DiffEngine::new(DiffOptions::default().with_key_field(key_field))
        .compare(baseline, candidate, context)
}
