//! Snapshot data model.

use crate::snapshot::fields;
use crate::snapshot::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// One cell of a repository record.
///
/// Every collected value (string, boolean, count, timestamp) is held in its
/// textual form; comparison semantics live in [`crate::diff::comparator`].
/// Serializes as a JSON string, or `null` when missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FieldValue {
    /// Absent cell, or one of the collector's missing-value tokens
    #[default]
    Missing,
    /// Any present value
    Text(String),
}

impl FieldValue {
    /// Build a value from a raw cell, mapping missing-value tokens to `Missing`.
    pub fn from_raw(raw: &str) -> Self {
        if fields::is_missing_token(raw) {
            FieldValue::Missing
        } else {
            FieldValue::Text(raw.to_string())
        }
    }

    /// Build a present value verbatim.
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// True for `Missing` and for text that is itself a missing-value token.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Missing => true,
            FieldValue::Text(t) => fields::is_missing_token(t),
        }
    }

    /// The textual content, if present.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Text(t) => Some(t),
        }
    }

    /// Cell form used by tabular writers: missing values become empty cells.
    pub fn as_cell(&self) -> &str {
        self.as_text().unwrap_or("")
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            None => FieldValue::Missing,
            Some(s) => FieldValue::Text(s),
        }
    }
}

impl From<FieldValue> for Option<String> {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Missing => None,
            FieldValue::Text(s) => Some(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::from_raw(value)
    }
}

static MISSING: FieldValue = FieldValue::Missing;

/// One repository row of a snapshot.
///
/// An ordered mapping from field name to value. Field order is the column
/// order of the source file and drives the order of emitted discrepancies.
/// Columns the loader removed as volatile do not appear here; the date view
/// and collection timestamp are kept on the side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoRecord {
    fields: Vec<(String, FieldValue)>,
    dates: BTreeMap<String, DateTime<Utc>>,
    collected_at: FieldValue,
}

impl RepoRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append (or overwrite) a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set the collection timestamp, builder style.
    pub fn with_collected_at(mut self, value: impl Into<FieldValue>) -> Self {
        self.collected_at = value.into();
        self
    }

    /// Attach a parsed date view, builder style.
    pub fn with_date(mut self, name: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.dates.insert(name.into(), value);
        self
    }

    /// Insert or overwrite a field. New fields keep insertion order.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Field value, or `None` if the record has no such column.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Field value, treating an absent column as missing.
    pub fn value(&self, name: &str) -> &FieldValue {
        self.get(name).unwrap_or(&MISSING)
    }

    /// Fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of retained fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Identity key value, if present.
    pub fn key(&self, key_field: &str) -> Option<&str> {
        self.get(key_field)
            .filter(|v| !v.is_missing())
            .and_then(FieldValue::as_text)
    }

    /// `owner/name` display id. Falls back to the bare key without an owner.
    pub fn display_id(&self, key_field: &str) -> String {
        let key = self.value(key_field).as_cell();
        match self.get(fields::OWNER_LOGIN).and_then(FieldValue::as_text) {
            Some(owner) => format!("{}/{}", owner, key),
            None => key.to_string(),
        }
    }

    /// Parsed timestamp for a date column (`pushedAt`, `updatedAt`).
    pub fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        self.dates.get(name).copied()
    }

    /// Row collection timestamp (`Inventoried`).
    pub fn collected_at(&self) -> &FieldValue {
        &self.collected_at
    }
}

/// An organization's repository inventory at one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    stage: Stage,
    source: String,
    columns: Vec<String>,
    records: Vec<RepoRecord>,
    dropped_duplicates: Vec<String>,
}

impl Snapshot {
    /// Build a snapshot from explicit columns and records.
    ///
    /// No deduplication happens here; see [`Snapshot::deduplicated`].
    pub fn new(stage: Stage, columns: Vec<String>, records: Vec<RepoRecord>) -> Self {
        Self {
            source: stage.as_str().to_string(),
            stage,
            columns,
            records,
            dropped_duplicates: Vec::new(),
        }
    }

    /// Build a snapshot whose columns are the union of record fields in
    /// first-seen order.
    pub fn from_records(stage: Stage, records: Vec<RepoRecord>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut columns = Vec::new();
        for record in &records {
            for (name, _) in record.fields() {
                if seen.insert(name.to_string()) {
                    columns.push(name.to_string());
                }
            }
        }
        Self::new(stage, columns, records)
    }

    /// Label the snapshot with its origin (file path or collector name).
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Drop rows whose key repeats an earlier row. First occurrence wins.
    ///
    /// Rows without a key are kept; they can never match anything. The names
    /// of dropped rows are logged and kept in [`Snapshot::dropped_duplicates`].
    pub fn deduplicated(mut self, key_field: &str) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut kept = Vec::with_capacity(self.records.len());
        let mut dropped = Vec::new();

        for record in self.records {
            let duplicate = match record.key(key_field) {
                Some(key) => !seen.insert(key.to_string()),
                None => false,
            };
            if duplicate {
                dropped.push(record.value(key_field).as_cell().to_string());
            } else {
                kept.push(record);
            }
        }

        if !dropped.is_empty() {
            tracing::warn!(
                stage = self.stage.as_str(),
                source = %self.source,
                duplicates = dropped.len(),
                names = ?dropped,
                "dropped repositories with duplicate `{}` values, keeping first occurrence",
                key_field
            );
        }

        self.records = kept;
        self.dropped_duplicates.extend(dropped);
        self
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Retained columns in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn records(&self) -> &[RepoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keys removed by [`Snapshot::deduplicated`].
    pub fn dropped_duplicates(&self) -> &[String] {
        &self.dropped_duplicates
    }

    /// Key → record lookup. On duplicate keys the first record wins.
    pub fn index_by(&self, key_field: &str) -> HashMap<&str, &RepoRecord> {
        let mut index = HashMap::with_capacity(self.records.len());
        for record in &self.records {
            if let Some(key) = record.key(key_field) {
                index.entry(key).or_insert(record);
            }
        }
        index
    }

    /// First record whose key equals `key` (case-sensitive).
    pub fn find(&self, key_field: &str, key: &str) -> Option<&RepoRecord> {
        self.records.iter().find(|r| r.key(key_field) == Some(key))
    }
}
