//! Recognized inventory field names.
//!
//! Snapshot columns are free-form; the names below are the ones orgmig gives
//! a meaning to. Any other column passes through untouched and is compared
//! like every other field.

/// Version of the recognized-field set below. Bump when a field changes role.
pub const FIELD_SCHEMA_VERSION: u32 = 1;

/// Repository name; the default identity key.
pub const NAME: &str = "name";
/// Owning organization login; used only to display `owner/name`.
pub const OWNER_LOGIN: &str = "owner.login";
/// Per-row collection timestamp written by the collector.
pub const INVENTORIED: &str = "Inventoried";

pub const CREATED_AT: &str = "createdAt";
pub const PUSHED_AT: &str = "pushedAt";
pub const UPDATED_AT: &str = "updatedAt";
pub const URL: &str = "url";
pub const ISSUE_COMMENTS_TOTAL: &str = "issues.comments.totalCount";
pub const ISSUE_TIMELINE_TOTAL: &str = "issues.timelineItems.totalCount";

/// Fields that legitimately differ between snapshots taken at different
/// times. They are dropped by the loader and never compared.
pub const EXCLUDED_FIELDS: &[&str] = &[
    CREATED_AT,
    PUSHED_AT,
    UPDATED_AT,
    URL,
    ISSUE_COMMENTS_TOTAL,
    ISSUE_TIMELINE_TOTAL,
    INVENTORIED,
];

/// Columns that keep a parsed timestamp view alongside their string value.
pub const DATE_FIELDS: &[&str] = &[UPDATED_AT, PUSHED_AT];

/// Cell contents that load as a missing value.
///
/// Matches the default NA set of the pandas-based collector so that a cell
/// the collector wrote as `NaN` or `None` compares equal to an empty cell.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True if `field` is one of [`EXCLUDED_FIELDS`].
pub fn is_excluded(field: &str) -> bool {
    EXCLUDED_FIELDS.contains(&field)
}

/// True if `field` carries a date view.
pub fn is_date_field(field: &str) -> bool {
    DATE_FIELDS.contains(&field)
}

/// True if a raw cell is one of the missing-value tokens.
pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_timestamp_is_excluded() {
        assert!(is_excluded(INVENTORIED));
        assert!(is_excluded(PUSHED_AT));
        assert!(!is_excluded(NAME));
        assert!(!is_excluded("visibility"));
    }

    #[test]
    fn test_missing_tokens_are_case_exact() {
        assert!(is_missing_token(""));
        assert!(is_missing_token("NaN"));
        assert!(is_missing_token("None"));
        // pandas only knows these exact spellings
        assert!(!is_missing_token("NONE"));
        assert!(!is_missing_token("none"));
    }
}
