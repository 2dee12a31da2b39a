//! Application configuration: TOML file plus command-line overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use backwatch_core::{ScanConfig, ScanError};
use backwatch_report::NotifyConfig;

/// Default report file name.
pub const DEFAULT_REPORT_FILE: &str = "backup_report.txt";

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Where the rendered report is written.
    pub path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

/// Everything the binary reads from its config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub report: ReportConfig,
    pub notify: NotifyConfig,
}

impl AppConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("backwatch").join("config.toml"))
    }

    /// Parse a config from TOML text.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ScanError> {
        toml::from_str(content).map_err(|e| ScanError::ConfigFile {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content, path)
    }

    /// Load the explicit file if given, else the default location if it
    /// exists, else built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ScanError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading default config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub threshold_years: Option<u32>,
    pub max_depth: Option<u32>,
    pub extra_excludes: Vec<String>,
    pub report_path: Option<PathBuf>,
    pub no_notify: bool,
}

impl AppConfig {
    /// Apply command-line overrides and validate the scan settings.
    pub fn apply(mut self, overrides: Overrides) -> Result<Self, ScanError> {
        if let Some(root) = overrides.root {
            self.scan.root = root;
        }
        if let Some(years) = overrides.threshold_years {
            self.scan.threshold_years = years;
        }
        if let Some(depth) = overrides.max_depth {
            self.scan.max_depth = depth;
        }
        for name in overrides.extra_excludes {
            if !self.scan.excluded_names.contains(&name) {
                self.scan.excluded_names.push(name);
            }
        }
        if let Some(path) = overrides.report_path {
            self.report.path = path;
        }
        if overrides.no_notify {
            self.notify.enabled = false;
        }

        self.scan.validate()?;
        Ok(self)
    }
}
