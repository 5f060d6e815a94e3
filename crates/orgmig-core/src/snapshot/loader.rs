//! CSV snapshot loader.
//!
//! Boundary adapter between the collector's CSV files and [`Snapshot`].

use crate::errors::{ExError, MigrateError, Result};
use crate::snapshot::fields;
use crate::snapshot::model::{FieldValue, RepoRecord, Snapshot};
use crate::snapshot::stage::Stage;
use crate::{log_op_end, log_op_error, log_op_start};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Load a snapshot file, inferring its stage from the file name.
///
/// # Errors
///
/// - `Io`: the file does not exist or cannot be read
/// - `MalformedSnapshot`: no header, no `name` column, or not a valid table
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    load_snapshot_as(path, Stage::from_path(path))
}

/// Load a snapshot file under an explicit stage.
///
/// # Errors
///
/// Same as [`load_snapshot`].
pub fn load_snapshot_as(path: &Path, stage: Stage) -> Result<Snapshot> {
    let start = Instant::now();
    let path_str = path.display().to_string();
    log_op_start!("load_snapshot", path = %path_str, stage = stage.as_str());

    let result = std::fs::File::open(path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExError::from(MigrateError::SnapshotNotFound {
                    path: path_str.clone(),
                })
            } else {
                ExError::from(e).with_path(path)
            }
        })
        .and_then(|file| read_snapshot(file, stage, &path_str));

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(snapshot) => {
            log_op_end!(
                "load_snapshot",
                duration_ms = duration_ms,
                rows = snapshot.len(),
                duplicates = snapshot.dropped_duplicates().len()
            );
        }
        Err(e) => log_op_error!("load_snapshot", e.clone(), duration_ms = duration_ms),
    }
    result.map_err(|e| e.with_op("load_snapshot"))
}

/// Read a snapshot from any CSV source.
///
/// `source` labels the snapshot in errors and logs. The result is
/// deduplicated on `name` (first occurrence wins).
///
/// # Errors
///
/// - `MalformedSnapshot`: no header, no `name` column, a row longer than the
///   header, or bytes that are not CSV
///
/// Cells that are not valid UTF-8 are decoded with replacement characters
/// and logged; they never fail the load. Repeated header names become
/// `name.1`, `name.2`, ...
/// - `Io`: the reader failed
pub fn read_snapshot<R: Read>(mut reader: R, stage: Stage, source: &str) -> Result<Snapshot> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| ExError::from(e).with_path(source))?;
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(&data);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let raw_headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(|e| not_tabular(source, e))?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    let headers = mangle_duplicate_headers(&raw_headers);
    if headers != raw_headers {
        tracing::warn!(snapshot = source, headers = ?headers, "duplicate column names renamed");
    }

    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.is_empty()) {
        return Err(MigrateError::EmptySnapshot {
            snapshot: source.to_string(),
        }
        .into());
    }
    if !headers.iter().any(|h| h == fields::NAME) {
        return Err(MigrateError::MissingKeyColumn {
            snapshot: source.to_string(),
            column: fields::NAME.to_string(),
        }
        .into());
    }

    let columns: Vec<String> = headers
        .iter()
        .filter(|h| !fields::is_excluded(h))
        .cloned()
        .collect();

    let mut records = Vec::new();
    for row in csv_reader.byte_records() {
        let row = row.map_err(|e| not_tabular(source, e))?;
        if row.len() > headers.len() {
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            return Err(MigrateError::NotTabular {
                snapshot: source.to_string(),
                reason: format!(
                    "line {} has {} fields, header has {}",
                    line,
                    row.len(),
                    headers.len()
                ),
            }
            .into());
        }
        let record = record_from_row(&headers, &row);

        let undecodable: Vec<&str> = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| std::str::from_utf8(cell).is_err())
            .map(|(h, _)| h.as_str())
            .collect();
        if !undecodable.is_empty() {
            tracing::warn!(
                snapshot = source,
                repo = record.value(fields::NAME).as_cell(),
                columns = ?undecodable,
                "cells are not valid UTF-8, invalid bytes replaced"
            );
        }
        records.push(record);
    }

    Ok(Snapshot::new(stage, columns, records)
        .with_source(source)
        .deduplicated(fields::NAME))
}

/// Rename repeated header names to `name.1`, `name.2`, ... in order.
fn mangle_duplicate_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<&str, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());
    for name in raw {
        let mut header = name.clone();
        while seen.contains(&header) {
            let n = suffixes.entry(name.as_str()).or_insert(0);
            *n += 1;
            header = format!("{name}.{n}");
        }
        seen.insert(header.clone());
        headers.push(header);
    }
    headers
}

fn record_from_row(headers: &[String], row: &csv::ByteRecord) -> RepoRecord {
    let mut record = RepoRecord::new();
    for (idx, header) in headers.iter().enumerate() {
        // Short rows are padded with missing values
        let raw = String::from_utf8_lossy(row.get(idx).unwrap_or(b""));
        let raw = raw.as_ref();

        if header == fields::INVENTORIED {
            record = record.with_collected_at(FieldValue::from_raw(raw));
            continue;
        }
        if fields::is_date_field(header) {
            if let Some(ts) = parse_timestamp(raw) {
                record = record.with_date(header.clone(), ts);
            }
        }
        if !fields::is_excluded(header) {
            record.set(header.clone(), FieldValue::from_raw(raw));
        }
    }
    record
}

fn not_tabular(source: &str, err: csv::Error) -> ExError {
    MigrateError::NotTabular {
        snapshot: source.to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// Parse a collector timestamp.
///
/// Accepts the GitHub API form (`2024-04-12T01:25:50Z`), any RFC 3339 offset,
/// and the pandas export form (`2024-04-12 01:25:50+00:00`, with or without
/// offset; naive values are taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if fields::is_missing_token(raw) {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use chrono::TimeZone;

    fn read(csv: &str) -> Result<Snapshot> {
        read_snapshot(csv.as_bytes(), Stage::BeforeSource, "test.csv")
    }

    #[test]
    fn test_reads_rows_and_drops_excluded_columns() {
        let snapshot = read(
            "name,owner.login,visibility,pushedAt,url,Inventoried\n\
             repo1,acme,Private,2024-04-12T01:25:50Z,https://x,2024-05-01\n",
        )
        .unwrap();

        assert_eq!(
            snapshot.columns(),
            &["name".to_string(), "owner.login".to_string(), "visibility".to_string()]
        );
        let record = &snapshot.records()[0];
        assert_eq!(record.get("url"), None);
        assert_eq!(record.get("pushedAt"), None);
        assert_eq!(record.collected_at(), &FieldValue::text("2024-05-01"));
        assert_eq!(
            record.date("pushedAt"),
            Some(Utc.with_ymd_and_hms(2024, 4, 12, 1, 25, 50).unwrap())
        );
    }

    #[test]
    fn test_missing_name_column_is_malformed() {
        let err = read("id,visibility\n1,Private\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::MalformedSnapshot);
        assert_eq!(err.column(), Some("name"));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = read("").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::MalformedSnapshot);
    }

    #[test]
    fn test_overlong_row_is_malformed() {
        let err = read("name,visibility\nrepo1,Private,extra\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::MalformedSnapshot);
    }

    #[test]
    fn test_short_row_is_padded_with_missing() {
        let snapshot = read("name,visibility,topics\nrepo1,Private\n").unwrap();
        assert_eq!(snapshot.records()[0].get("topics"), Some(&FieldValue::Missing));
    }

    #[test]
    fn test_bom_is_stripped() {
        let snapshot = read("\u{feff}name,visibility\nrepo1,Private\n").unwrap();
        assert!(snapshot.has_column("name"));
    }

    #[test]
    fn test_missing_tokens_load_as_missing() {
        let snapshot = read("name,a,b,c\nrepo1,,NaN,None\n").unwrap();
        let record = &snapshot.records()[0];
        for col in ["a", "b", "c"] {
            assert_eq!(record.get(col), Some(&FieldValue::Missing), "column {col}");
        }
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let snapshot = read("name,visibility\nrepo1,Private\nrepo1,Public\nrepo2,Public\n").unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.find("name", "repo1").unwrap().value("visibility"),
            &FieldValue::text("Private")
        );
        assert_eq!(snapshot.dropped_duplicates(), &["repo1".to_string()]);
    }

    #[test]
    fn test_repeated_headers_are_suffixed() {
        let snapshot = read("name,topics,topics,topics\nrepo1,a,b,c\n").unwrap();
        assert_eq!(snapshot.columns(), ["name", "topics", "topics.1", "topics.2"]);
        let record = &snapshot.records()[0];
        assert_eq!(record.value("topics"), &FieldValue::text("a"));
        assert_eq!(record.value("topics.2"), &FieldValue::text("c"));
    }

    #[test]
    fn test_invalid_utf8_cell_stays_in_its_row() {
        let data: &[u8] =
            b"name,owner.login,visibility,description\nrepo1,acme,Private,ok\nrepo2,acme,Public,caf\xE9\n";
        let snapshot = read_snapshot(data, Stage::BeforeSource, "latin1.csv").unwrap();

        assert_eq!(snapshot.len(), 2);
        let repo2 = snapshot.find("name", "repo2").unwrap();
        assert_eq!(repo2.value("visibility"), &FieldValue::text("Public"));
        assert_eq!(repo2.value("description"), &FieldValue::text("caf\u{FFFD}"));
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 4, 12, 1, 25, 50).unwrap();
        assert_eq!(parse_timestamp("2024-04-12T01:25:50Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-04-12 01:25:50+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-04-12 01:25:50"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_load_missing_file_is_io_error_naming_path() {
        let err = load_snapshot(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.path(), Some("/definitely/not/here.csv"));
        assert_eq!(err.op(), Some("load_snapshot"));
    }
}
