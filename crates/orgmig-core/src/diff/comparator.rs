//! Field equality semantics.
//!
//! GitHub reports the same fact with inconsistent casing across APIs and over
//! time (`PRIVATE` vs `private`), and the collector writes absent data in
//! several spellings. A discrepancy is only reported when two values differ
//! after both effects are taken into account.

use crate::snapshot::FieldValue;
use serde::{Deserialize, Serialize};

/// Decides whether two field values constitute a discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldComparator {
    /// Compare textual values case-insensitively
    pub case_insensitive: bool,
}

impl Default for FieldComparator {
    fn default() -> Self {
        Self {
            case_insensitive: true,
        }
    }
}

impl FieldComparator {
    /// True if `a` and `b` differ.
    ///
    /// 1. Two missing values are equal, whatever their spelling.
    /// 2. A missing value never equals a present one.
    /// 3. Present values compare after lower-casing (when case-insensitive).
    pub fn values_differ(&self, a: &FieldValue, b: &FieldValue) -> bool {
        match (a.is_missing(), b.is_missing()) {
            (true, true) => false,
            (true, false) | (false, true) => true,
            (false, false) => {
                let (a, b) = (a.as_cell(), b.as_cell());
                if self.case_insensitive {
                    a.to_lowercase() != b.to_lowercase()
                } else {
                    a != b
                }
            }
        }
    }
}

/// [`FieldComparator::values_differ`] with the default (case-insensitive) comparator.
pub fn values_differ(a: &FieldValue, b: &FieldValue) -> bool {
    FieldComparator::default().values_differ(a, b)
}
