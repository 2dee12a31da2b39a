//! Per-run scan state: cutoff date, counters and the ordered event log.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Months, NaiveDate};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanWarning};

/// Age status of a classified folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderStatus {
    /// Modified on or after the cutoff date.
    Valid,
    /// Modified strictly before the cutoff date.
    Obsolete,
}

impl FolderStatus {
    /// Classify a modification date against a cutoff.
    pub fn from_dates(last_modified: NaiveDate, cutoff: NaiveDate) -> Self {
        if last_modified < cutoff {
            Self::Obsolete
        } else {
            Self::Valid
        }
    }

    /// Check if this is the obsolete status.
    pub fn is_obsolete(&self) -> bool {
        matches!(self, Self::Obsolete)
    }
}

impl fmt::Display for FolderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Obsolete => write!(f, "obsolete"),
        }
    }
}

/// Result of classifying one backup folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEvent {
    /// Base name of the folder.
    pub folder_name: CompactString,
    /// Full path of the folder.
    pub path: PathBuf,
    /// Date portion of the last modification time, in local time.
    pub last_modified: NaiveDate,
    /// Age status relative to the session cutoff.
    pub status: FolderStatus,
}

/// Shape of a backup group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// The group directory is itself a backup unit (archive suffix).
    Archive,
    /// The group directory holds one backup unit per subdirectory.
    Parent,
}

/// An entry in the session's ordered log.
///
/// Headings mark where a sentinel root or a backup group starts so that a
/// renderer can reproduce the scan's structure; classifications point into
/// [`ScanSession::events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanRecord {
    /// A directory containing the sentinel marker.
    Root { path: PathBuf },
    /// A backup group about to be resolved.
    Group { name: CompactString, kind: GroupKind },
    /// Index of a classification event.
    Classified { index: usize },
}

/// Compute the cutoff date: `today` minus `years` calendar years.
///
/// February 29 maps to February 28 when the target year is not a leap year.
pub fn cutoff_date(today: NaiveDate, years: u32) -> Option<NaiveDate> {
    let months = years.checked_mul(12)?;
    today.checked_sub_months(Months::new(months))
}

/// State of one scan run.
///
/// The counters only move through [`ScanSession::record`], which keeps
/// `total_obsolete <= total_analyzed == events.len()` and counts each path at
/// most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    root: PathBuf,
    scan_date: NaiveDate,
    cutoff: NaiveDate,
    total_analyzed: u64,
    total_obsolete: u64,
    events: Vec<ClassificationEvent>,
    records: Vec<ScanRecord>,
    warnings: Vec<ScanWarning>,
    #[serde(skip)]
    classified: HashSet<PathBuf>,
}

impl ScanSession {
    /// Start a session whose cutoff is `scan_date` minus `threshold_years`.
    pub fn new(
        root: impl Into<PathBuf>,
        scan_date: NaiveDate,
        threshold_years: u32,
    ) -> Result<Self, ScanError> {
        let cutoff =
            cutoff_date(scan_date, threshold_years).ok_or_else(|| ScanError::InvalidConfig {
                message: format!("Age threshold of {threshold_years} years is out of range"),
            })?;
        Ok(Self::with_cutoff(root, scan_date, cutoff))
    }

    /// Start a session with an explicit cutoff date.
    pub fn with_cutoff(root: impl Into<PathBuf>, scan_date: NaiveDate, cutoff: NaiveDate) -> Self {
        Self {
            root: root.into(),
            scan_date,
            cutoff,
            total_analyzed: 0,
            total_obsolete: 0,
            events: Vec::new(),
            records: Vec::new(),
            warnings: Vec::new(),
            classified: HashSet::new(),
        }
    }

    /// Classify a folder and append the event.
    ///
    /// Returns `None` without touching the counters if `path` was already
    /// classified in this session.
    pub fn record(
        &mut self,
        path: &Path,
        last_modified: NaiveDate,
    ) -> Option<&ClassificationEvent> {
        if !self.classified.insert(path.to_path_buf()) {
            return None;
        }

        let status = FolderStatus::from_dates(last_modified, self.cutoff);
        let folder_name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::new(path.to_string_lossy()));

        self.total_analyzed += 1;
        if status.is_obsolete() {
            self.total_obsolete += 1;
        }

        let index = self.events.len();
        self.events.push(ClassificationEvent {
            folder_name,
            path: path.to_path_buf(),
            last_modified,
            status,
        });
        self.records.push(ScanRecord::Classified { index });
        self.events.get(index)
    }

    /// Check if `path` has already been classified.
    pub fn is_classified(&self, path: &Path) -> bool {
        self.classified.contains(path)
    }

    /// Mark the start of a sentinel root in the log.
    pub fn enter_root(&mut self, path: &Path) {
        self.records.push(ScanRecord::Root {
            path: path.to_path_buf(),
        });
    }

    /// Mark the start of a backup group in the log.
    pub fn enter_group(&mut self, name: &str, kind: GroupKind) {
        self.records.push(ScanRecord::Group {
            name: CompactString::new(name),
            kind,
        });
    }

    /// Record a non-fatal warning.
    pub fn warn(&mut self, warning: ScanWarning) {
        self.warnings.push(warning);
    }

    /// Root path of the scan.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Date the scan was run.
    pub fn scan_date(&self) -> NaiveDate {
        self.scan_date
    }

    /// Fixed cutoff date; folders modified before it are obsolete.
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Number of folders classified.
    pub fn total_analyzed(&self) -> u64 {
        self.total_analyzed
    }

    /// Number of folders classified as obsolete.
    pub fn total_obsolete(&self) -> u64 {
        self.total_obsolete
    }

    /// Number of folders classified as valid.
    pub fn total_valid(&self) -> u64 {
        self.total_analyzed - self.total_obsolete
    }

    /// Classification events in scan order.
    pub fn events(&self) -> &[ClassificationEvent] {
        &self.events
    }

    /// Full ordered log including headings.
    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    /// Warnings for paths that could not be inspected.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Check if any path was skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Events with obsolete status.
    pub fn obsolete_events(&self) -> impl Iterator<Item = &ClassificationEvent> {
        self.events.iter().filter(|e| e.status.is_obsolete())
    }
}
