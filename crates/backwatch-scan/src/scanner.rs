//! Scan entry point tying the engine components to a configuration.

use std::time::Instant;

use chrono::{Local, NaiveDate};

use backwatch_core::{PathFilter, ScanConfig, ScanError, ScanSession};

use crate::group::BackupGroupResolver;
use crate::sentinel::SentinelDetector;
use crate::walker::RecursiveWalker;

/// Runs a complete backup age scan for one configuration.
#[derive(Debug, Clone)]
pub struct BackupScanner {
    config: ScanConfig,
    filter: PathFilter,
}

impl BackupScanner {
    /// Create a scanner, validating the configuration.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        let filter = config.path_filter();
        Ok(Self { config, filter })
    }

    /// The configuration this scanner runs with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan with today's local date as the reference date.
    pub fn scan(&self) -> Result<ScanSession, ScanError> {
        self.scan_as_of(Local::now().date_naive())
    }

    /// Scan using `today` as the reference date for the cutoff.
    ///
    /// Only configuration problems (including an unusable root) fail; access
    /// errors below the root end up as warnings on the returned session.
    pub fn scan_as_of(&self, today: NaiveDate) -> Result<ScanSession, ScanError> {
        let start = Instant::now();
        let root = &self.config.root;

        let metadata = std::fs::metadata(root).map_err(|e| ScanError::InvalidConfig {
            message: format!("Root path {} is not accessible: {e}", root.display()),
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root.clone() });
        }

        let mut session = ScanSession::new(root.clone(), today, self.config.threshold_years)?;
        tracing::info!(
            root = %root.display(),
            cutoff = %session.cutoff(),
            max_depth = self.config.max_depth,
            "starting backup scan"
        );

        self.walker().walk(&mut session, root);

        tracing::info!(
            analyzed = session.total_analyzed(),
            obsolete = session.total_obsolete(),
            warnings = session.warnings().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "backup scan finished"
        );
        Ok(session)
    }

    /// Group resolver bound to this scanner's settings.
    pub fn resolver(&self) -> BackupGroupResolver<'_> {
        BackupGroupResolver::new(&self.filter, &self.config.archive_suffix)
    }

    /// Sentinel detector bound to this scanner's settings.
    pub fn detector(&self) -> SentinelDetector<'_> {
        SentinelDetector::new(&self.filter, &self.config.sentinel_name, self.resolver())
    }

    /// Walker bound to this scanner's settings.
    pub fn walker(&self) -> RecursiveWalker<'_> {
        RecursiveWalker::new(&self.filter, self.detector(), self.config.max_depth)
    }
}
