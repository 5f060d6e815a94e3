use orgmig_core::{RepoRecord, Snapshot, Stage};
use std::path::{Path, PathBuf};

/// Build a repository record with `name`, `owner.login` and extra fields
#[allow(dead_code)]
pub fn repo(name: &str, owner: &str, fields: &[(&str, &str)]) -> RepoRecord {
    let mut record = RepoRecord::new()
        .with_field("name", name)
        .with_field("owner.login", owner);
    for (key, value) in fields {
        record.set(*key, *value);
    }
    record
}

/// Build a snapshot from records, columns in first-seen order
#[allow(dead_code)]
pub fn snapshot(stage: Stage, records: Vec<RepoRecord>) -> Snapshot {
    Snapshot::from_records(stage, records)
}

/// Write a file under `dir`, creating parent directories
#[allow(dead_code)]
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// A GEI repository log with the given outcome and extra entries
#[allow(dead_code)]
pub fn repo_log(start: &str, end: &str, succeeded: bool, extra: &[&str]) -> String {
    let mut log = format!("[{start}] [INFO] Migration started\n");
    for line in extra {
        log.push_str(line);
        log.push('\n');
    }
    let marker = if succeeded {
        "Migration complete"
    } else {
        "Migration failed"
    };
    let level = if succeeded { "INFO" } else { "ERROR" };
    log.push_str(&format!("[{end}] [{level}] {marker}\n"));
    log
}
