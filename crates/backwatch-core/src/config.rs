//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::filter::PathFilter;

/// Default age threshold, in years.
pub const DEFAULT_THRESHOLD_YEARS: u32 = 2;

/// Default maximum traversal depth below the root.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Marker entry whose presence flags a directory as holding backup groups.
pub const DEFAULT_SENTINEL_NAME: &str = "@eaDir";

/// Suffix of a directory that is itself a backup unit.
pub const DEFAULT_ARCHIVE_SUFFIX: &str = ".hbk";

/// Structural exclusion prefix.
pub const DEFAULT_EXCLUDED_PREFIX: &str = "@";

/// System and metadata entries that are never backup content.
pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &[
    "@eaDir",
    "#recycle",
    "#snapshot",
    ".DS_Store",
    "ActiveBackupforBusiness",
];

/// Configuration for a backup age scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq, Eq)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path where the walk starts.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Folders last modified more than this many years ago are obsolete.
    #[builder(default = "DEFAULT_THRESHOLD_YEARS")]
    #[serde(default = "default_threshold_years")]
    pub threshold_years: u32,

    /// Maximum depth to traverse, measured from the root (root = 0). Must be
    /// at least 1.
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Literal entry names that are never visited or classified.
    #[builder(default = "default_excluded_names()")]
    #[serde(default = "default_excluded_names")]
    pub excluded_names: Vec<String>,

    /// Entries starting with this prefix are never visited or classified.
    #[builder(default = "DEFAULT_EXCLUDED_PREFIX.to_string()")]
    #[serde(default = "default_excluded_prefix")]
    pub excluded_prefix: String,

    /// Marker entry name checked for presence in each visited directory.
    #[builder(default = "DEFAULT_SENTINEL_NAME.to_string()")]
    #[serde(default = "default_sentinel_name")]
    pub sentinel_name: String,

    /// Directory name suffix identifying a single backup unit.
    #[builder(default = "DEFAULT_ARCHIVE_SUFFIX.to_string()")]
    #[serde(default = "default_archive_suffix")]
    pub archive_suffix: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_threshold_years() -> u32 {
    DEFAULT_THRESHOLD_YEARS
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_excluded_names() -> Vec<String> {
    DEFAULT_EXCLUDED_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_excluded_prefix() -> String {
    DEFAULT_EXCLUDED_PREFIX.to_string()
}

fn default_sentinel_name() -> String {
    DEFAULT_SENTINEL_NAME.to_string()
}

fn default_archive_suffix() -> String {
    DEFAULT_ARCHIVE_SUFFIX.to_string()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            Some(_) => {}
            None => return Err("Root path is required".to_string()),
        }
        if self.threshold_years == Some(0) {
            return Err("Age threshold must be at least one year".to_string());
        }
        if self.max_depth == Some(0) {
            return Err("Maximum depth must be at least one".to_string());
        }
        if matches!(self.sentinel_name, Some(ref s) if s.is_empty()) {
            return Err("Sentinel name cannot be empty".to_string());
        }
        if matches!(self.archive_suffix, Some(ref s) if s.is_empty()) {
            return Err("Archive suffix cannot be empty".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with default settings for the given root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            threshold_years: DEFAULT_THRESHOLD_YEARS,
            max_depth: DEFAULT_MAX_DEPTH,
            excluded_names: default_excluded_names(),
            excluded_prefix: default_excluded_prefix(),
            sentinel_name: default_sentinel_name(),
            archive_suffix: default_archive_suffix(),
        }
    }

    /// Check the settings that the builder validates, for configs that were
    /// deserialized or mutated after construction.
    pub fn validate(&self) -> Result<(), ScanError> {
        let invalid = |message: &str| ScanError::InvalidConfig {
            message: message.to_string(),
        };
        if self.root.as_os_str().is_empty() {
            return Err(invalid("Root path cannot be empty"));
        }
        if self.threshold_years == 0 {
            return Err(invalid("Age threshold must be at least one year"));
        }
        if self.max_depth == 0 {
            return Err(invalid("Maximum depth must be at least one"));
        }
        if self.sentinel_name.is_empty() {
            return Err(invalid("Sentinel name cannot be empty"));
        }
        if self.archive_suffix.is_empty() {
            return Err(invalid("Archive suffix cannot be empty"));
        }
        Ok(())
    }

    /// Build the exclusion filter described by this config.
    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(self.excluded_names.iter().cloned(), self.excluded_prefix.clone())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(default_root())
    }
}
