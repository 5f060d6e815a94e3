//! Discrepancy report and its serialized forms.
//!
//! The CSV form is the hand-off format to the migration workbook: one row per
//! discrepancy, fixed columns ([`REPORT_COLUMNS`]), missing values as empty
//! cells.

use crate::diff::model::{DiffStats, FieldDiscrepancy, REPORT_COLUMNS};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

/// Ordered discrepancies plus the row accounting of the run that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    discrepancies: Vec<FieldDiscrepancy>,
    stats: DiffStats,
}

impl DiffReport {
    pub fn new(discrepancies: Vec<FieldDiscrepancy>, stats: DiffStats) -> Self {
        Self {
            discrepancies,
            stats,
        }
    }

    pub fn discrepancies(&self) -> &[FieldDiscrepancy] {
        &self.discrepancies
    }

    pub fn into_discrepancies(self) -> Vec<FieldDiscrepancy> {
        self.discrepancies
    }

    pub fn stats(&self) -> &DiffStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.discrepancies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDiscrepancy> {
        self.discrepancies.iter()
    }

    /// Discrepancy count per column, sorted by column name.
    pub fn counts_by_column(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for d in &self.discrepancies {
            *counts.entry(d.field_name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Discrepancy count per baseline repo, sorted by `owner/name`.
    pub fn counts_by_repo(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for d in &self.discrepancies {
            *counts.entry(d.source_repo_id.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Write the tabular form. The header is written even when there are no
    /// discrepancies.
    ///
    /// # Errors
    ///
    /// - `Io`: the writer failed
    /// - `Serialization`: a row could not be encoded
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(REPORT_COLUMNS)?;
        for discrepancy in &self.discrepancies {
            csv_writer.serialize(discrepancy)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Tabular form as a string.
    ///
    /// # Errors
    ///
    /// Same as [`DiffReport::write_csv`].
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("to_csv_string")
                .with_message(e.to_string())
        })
    }

    /// Write the tabular form to `path`, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Same as [`DiffReport::write_csv`], with the path attached.
    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        let start = Instant::now();
        let path_str = path.display().to_string();
        log_op_start!("write_report", path = %path_str);

        let result = std::fs::File::create(path)
            .map_err(ExError::from)
            .and_then(|file| self.write_csv(file))
            .map_err(|e| e.with_op("write_report").with_path(path));

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!(
                    "write_report",
                    duration_ms = duration_ms,
                    discrepancies = self.len()
                );
            }
            Err(e) => log_op_error!("write_report", e.clone(), duration_ms = duration_ms),
        }
        result
    }

    /// Read a report written by [`DiffReport::write_csv`].
    ///
    /// Row accounting is not part of the tabular form; the returned report
    /// carries default [`DiffStats`].
    ///
    /// # Errors
    ///
    /// - `MalformedSnapshot`: the header is not [`REPORT_COLUMNS`] or a row
    ///   does not fit it
    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if !headers.iter().eq(REPORT_COLUMNS.iter().copied()) {
            return Err(ExError::new(ExErrorKind::MalformedSnapshot)
                .with_op("read_report")
                .with_message(format!(
                    "report header must be `{}`, got `{}`",
                    REPORT_COLUMNS.join(","),
                    headers.iter().collect::<Vec<_>>().join(",")
                )));
        }

        let discrepancies = csv_reader
            .deserialize::<FieldDiscrepancy>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ExError::from(e).with_op("read_report"))?;

        Ok(Self::new(discrepancies, DiffStats::default()))
    }

    /// Read a report file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be opened, otherwise as [`DiffReport::read_csv`].
    pub fn read_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| ExError::from(e).with_op("read_report").with_path(path))?;
        Self::read_csv(file).map_err(|e| e.with_path(path))
    }

    /// Write the report (discrepancies and stats) as pretty JSON.
    ///
    /// # Errors
    ///
    /// - `Serialization` / `Io`: encoding or writing failed
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DiffReport {
    type Item = &'a FieldDiscrepancy;
    type IntoIter = std::slice::Iter<'a, FieldDiscrepancy>;

    fn into_iter(self) -> Self::IntoIter {
        self.discrepancies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FieldValue;

    fn discrepancy(repo: &str, column: &str, before: &str, after: &str) -> FieldDiscrepancy {
        FieldDiscrepancy {
            source_repo_id: format!("acme/{repo}"),
            target_repo_id: format!("acme-emu/{repo}"),
            field_name: column.to_string(),
            baseline_value: FieldValue::from_raw(before),
            candidate_value: FieldValue::from_raw(after),
            context_value: FieldValue::Missing,
            baseline_collected_at: FieldValue::text("2024-05-01 10:00:00"),
            candidate_collected_at: FieldValue::text("2024-05-02 10:00:00"),
            context_collected_at: FieldValue::Missing,
        }
    }

    #[test]
    fn test_empty_report_is_header_only() {
        let csv = DiffReport::default().to_csv_string().unwrap();
        assert_eq!(
            csv,
            "source_name,target_name,column,source_value,target_value,context_value,source_date,target_date,context_date\n"
        );
    }

    #[test]
    fn test_missing_values_are_empty_cells() {
        let report = DiffReport::new(
            vec![discrepancy("r1", "homepageUrl", "https://x", "")],
            DiffStats::default(),
        );
        let csv = report.to_csv_string().unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "acme/r1,acme-emu/r1,homepageUrl,https://x,,,2024-05-01 10:00:00,2024-05-02 10:00:00,"
        );
    }

    #[test]
    fn test_read_back_written_report() {
        let report = DiffReport::new(
            vec![
                discrepancy("r1", "isArchived", "True", "False"),
                discrepancy("r2", "visibility", "private", "internal"),
            ],
            DiffStats::default(),
        );
        let csv = report.to_csv_string().unwrap();
        let read = DiffReport::read_csv(csv.as_bytes()).unwrap();
        assert_eq!(read, report);
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let err = DiffReport::read_csv("name,visibility\nr1,Private\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::MalformedSnapshot);
    }

    #[test]
    fn test_counts_are_sorted_by_key() {
        let report = DiffReport::new(
            vec![
                discrepancy("r2", "visibility", "a", "b"),
                discrepancy("r1", "isArchived", "a", "b"),
                discrepancy("r1", "visibility", "a", "b"),
            ],
            DiffStats::default(),
        );
        let columns: Vec<_> = report.counts_by_column().into_iter().collect();
        assert_eq!(columns, vec![("isArchived", 1), ("visibility", 2)]);
        let repos: Vec<_> = report.counts_by_repo().into_iter().collect();
        assert_eq!(repos, vec![("acme/r1", 2), ("acme/r2", 1)]);
    }

    #[test]
    fn test_json_includes_stats() {
        let mut buf = Vec::new();
        DiffReport::default().write_json(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["stats"]["matched_rows"], 0);
        assert!(value["discrepancies"].as_array().unwrap().is_empty());
    }
}
