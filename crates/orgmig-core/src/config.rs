//! Configuration for orgmig runs.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables prefixed with `ORGMIG_` (`ORGMIG_DIFF__KEY_FIELD`
//!    for nested keys); a `.env` file in the working directory is honoured
//! 2. Config file (`--config PATH`, or `./orgmig.toml` when present)
//! 3. Built-in defaults
//!
//! Example config file:
//! ```toml
//! workbook_path = "report/Migration Workbook.xlsx"  # or ORGMIG_WORKBOOK
//! snapshot_dir = "logs"                              # or ORGMIG_SNAPSHOT_DIR
//! logs_dir = "migration-logs"                        # or ORGMIG_LOGS_DIR
//!
//! [diff]
//! key_field = "name"
//! extra_excluded_fields = ["diskUsage"]
//! case_insensitive = true
//! ```
//!
//! Access tokens are only ever read from `GH_SOURCE_PAT` / `GH_TARGET_PAT`.

use crate::diff::{DiffOptions, FieldComparator};
use crate::errors::{ExError, ExErrorKind, MigrateError, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat, Map};
use orgmig_core_types::Sensitive;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "orgmig.toml";

/// Prefix of the environment variables overriding file settings.
pub const ENV_PREFIX: &str = "ORGMIG";

pub const ENV_WORKBOOK: &str = "ORGMIG_WORKBOOK";
pub const ENV_SNAPSHOT_DIR: &str = "ORGMIG_SNAPSHOT_DIR";
pub const ENV_LOGS_DIR: &str = "ORGMIG_LOGS_DIR";
pub const ENV_SOURCE_PAT: &str = "GH_SOURCE_PAT";
pub const ENV_TARGET_PAT: &str = "GH_TARGET_PAT";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Migration workbook listing orgs per wave (`ORGMIG_WORKBOOK`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook_path: Option<PathBuf>,
    /// Directory holding `<stage>-wave-<N>.csv` snapshots.
    pub snapshot_dir: PathBuf,
    /// Directory holding GEI output, one subdirectory per org.
    pub logs_dir: PathBuf,
    /// Source org token, from `GH_SOURCE_PAT` only.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub source_pat: Option<Sensitive<String>>,
    /// Target org token, from `GH_TARGET_PAT` only.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub target_pat: Option<Sensitive<String>>,
    /// Diff engine settings.
    pub diff: DiffConfig,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            workbook_path: None,
            snapshot_dir: PathBuf::from("logs"),
            logs_dir: PathBuf::from("migration-logs"),
            source_pat: None,
            target_pat: None,
            diff: DiffConfig::default(),
        }
    }
}

/// Diff engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Column joining baseline and candidate rows.
    pub key_field: String,
    /// Columns excluded on top of the built-in volatile set.
    pub extra_excluded_fields: Vec<String>,
    /// Compare values case-insensitively.
    pub case_insensitive: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            key_field: crate::snapshot::fields::NAME.to_string(),
            extra_excluded_fields: Vec::new(),
            case_insensitive: true,
        }
    }
}

impl MigrationConfig {
    /// Load configuration from defaults, an optional file and the process
    /// environment, after loading `.env`.
    ///
    /// With `path = None`, `./orgmig.toml` is used if it exists.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: the file cannot be read, is not valid TOML, or
    ///   holds invalid values
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        let env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::load_with_env(path, env)
    }

    /// Layered load with an explicit environment map.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. The config file
    /// 3. `ORGMIG_` variables, e.g. `ORGMIG_SNAPSHOT_DIR` or
    ///    `ORGMIG_DIFF__KEY_FIELD` for nested keys
    /// 4. `GH_SOURCE_PAT` / `GH_TARGET_PAT` for the tokens
    ///
    /// # Errors
    ///
    /// Same as [`MigrationConfig::load`].
    pub fn load_with_env(path: Option<&Path>, env: Map<String, String>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        let source = match path {
            Some(path) => {
                tracing::debug!("Loading config from {:?}", path);
                builder = builder.add_source(
                    File::from(path).format(FileFormat::Toml).required(true),
                );
                path.display().to_string()
            }
            None => {
                let local_config = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local_config.is_file() {
                    tracing::debug!("Loading config from ./{}", DEFAULT_CONFIG_FILE);
                    builder = builder.add_source(
                        File::from(local_config).format(FileFormat::Toml).required(false),
                    );
                    DEFAULT_CONFIG_FILE.to_string()
                } else {
                    "defaults".to_string()
                }
            }
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true)
                .source(Some(env.clone())),
        );
        // `ORGMIG_WORKBOOK` names `workbook_path`, not a `workbook` key
        let workbook = env.get(ENV_WORKBOOK).filter(|v| !v.trim().is_empty());
        builder = builder
            .set_override_option("workbook_path", workbook.cloned())
            .map_err(|e| MigrateError::InvalidConfig {
                path: source.clone(),
                reason: e.to_string(),
            })?;

        let mut config = Self::deserialize_from(builder, &source)?;
        config.apply_tokens_from(|key| env.get(key).cloned());
        tracing::debug!(
            source = %source,
            snapshot_dir = %config.snapshot_dir.display(),
            key_field = %config.diff.key_field,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse config from TOML text. `source` labels the text in errors.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: invalid TOML or invalid values
    pub fn from_toml_str(text: &str, source: &str) -> Result<Self> {
        let builder = ConfigBuilder::builder().add_source(File::from_str(text, FileFormat::Toml));
        Self::deserialize_from(builder, source)
    }

    fn deserialize_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        source: &str,
    ) -> Result<Self> {
        let invalid = |e: config::ConfigError| MigrateError::InvalidConfig {
            path: source.to_string(),
            reason: e.to_string(),
        };
        let config: Self = builder
            .build()
            .map_err(invalid)?
            .try_deserialize()
            .map_err(invalid)?;
        config.validate(source)?;
        Ok(config)
    }

    /// Set the access tokens. `lookup` returns the value of a variable;
    /// blank values are ignored.
    pub fn apply_tokens_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_SOURCE_PAT) {
            self.source_pat = Some(Sensitive::new(v));
        }
        if let Some(v) = non_empty(ENV_TARGET_PAT) {
            self.target_pat = Some(Sensitive::new(v));
        }
    }

    fn validate(&self, source: &str) -> Result<()> {
        if self.diff.key_field.trim().is_empty() {
            return Err(MigrateError::InvalidConfig {
                path: source.to_string(),
                reason: "diff.key_field must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Diff engine options implied by this configuration.
    pub fn to_diff_options(&self) -> DiffOptions {
        DiffOptions {
            comparator: FieldComparator {
                case_insensitive: self.diff.case_insensitive,
            },
            ..DiffOptions::default()
        }
        .with_key_field(self.diff.key_field.clone())
        .exclude(self.diff.extra_excluded_fields.iter().cloned())
    }

    /// Resolved configuration as TOML, tokens redacted.
    ///
    /// # Errors
    ///
    /// - `Serialization`: the configuration could not be encoded
    pub fn to_redacted_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("to_redacted_toml")
                .with_message(e.to_string())
        })
    }
}
