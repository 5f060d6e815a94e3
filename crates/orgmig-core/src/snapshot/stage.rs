//! Pipeline stages and snapshot file naming.
//!
//! The collector writes one CSV per stage and wave, e.g.
//! `before-source-wave-3.csv`; dry-run inventories go into a `dry-run/`
//! subdirectory so they never overwrite production ones.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Subdirectory holding dry-run snapshots.
pub const DRY_RUN_DIR: &str = "dry-run";

/// When and where a snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Stage {
    BeforeSource,
    BeforeTarget,
    AfterSource,
    AfterTarget,
    /// Any other label (ad-hoc exports, renamed files)
    Other(String),
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::BeforeSource => "before-source",
            Stage::BeforeTarget => "before-target",
            Stage::AfterSource => "after-source",
            Stage::AfterTarget => "after-target",
            Stage::Other(label) => label,
        }
    }

    /// Canonical file name for this stage and wave.
    pub fn file_name(&self, wave: u32) -> String {
        format!("{}-wave-{}.csv", self.as_str(), wave)
    }

    /// Canonical path under `snapshot_dir`, honouring the dry-run layout.
    pub fn snapshot_path(&self, snapshot_dir: &Path, wave: u32, dry_run: bool) -> PathBuf {
        let dir = if dry_run {
            snapshot_dir.join(DRY_RUN_DIR)
        } else {
            snapshot_dir.to_path_buf()
        };
        dir.join(self.file_name(wave))
    }

    /// Infer the stage from a snapshot file name.
    ///
    /// `before-source-wave-3.csv` and `before-source.csv` both give
    /// `BeforeSource`; anything else becomes `Other(<file stem>)`.
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let label = match stem.rfind("-wave-") {
            Some(idx) if stem[idx + 6..].chars().all(|c| c.is_ascii_digit()) => &stem[..idx],
            _ => stem.as_str(),
        };
        Stage::from(label.to_string())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Stage {
    fn from(label: String) -> Self {
        match label.as_str() {
            "before-source" => Stage::BeforeSource,
            "before-target" => Stage::BeforeTarget,
            "after-source" => Stage::AfterSource,
            "after-target" => Stage::AfterTarget,
            _ => Stage::Other(label),
        }
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

impl FromStr for Stage {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Stage::from(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(Stage::AfterTarget.file_name(2), "after-target-wave-2.csv");
    }

    #[test]
    fn test_snapshot_path_dry_run() {
        let path = Stage::BeforeSource.snapshot_path(Path::new("logs"), 1, true);
        assert_eq!(path, Path::new("logs/dry-run/before-source-wave-1.csv"));
        let path = Stage::BeforeSource.snapshot_path(Path::new("logs"), 1, false);
        assert_eq!(path, Path::new("logs/before-source-wave-1.csv"));
    }

    #[test]
    fn test_from_path_recognizes_known_stages() {
        assert_eq!(
            Stage::from_path(Path::new("logs/after-source-wave-12.csv")),
            Stage::AfterSource
        );
        assert_eq!(
            Stage::from_path(Path::new("before-target.csv")),
            Stage::BeforeTarget
        );
        assert_eq!(
            Stage::from_path(Path::new("export-2024.csv")),
            Stage::Other("export-2024".to_string())
        );
    }

    #[test]
    fn test_round_trips_through_string() {
        for stage in [Stage::BeforeSource, Stage::Other("adhoc".to_string())] {
            let label: String = stage.clone().into();
            assert_eq!(label.parse::<Stage>().unwrap(), stage);
        }
    }
}
