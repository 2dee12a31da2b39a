//! Text and JSON rendering of a finished scan.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use backwatch_core::{
    ClassificationEvent, FolderStatus, GroupKind, ScanRecord, ScanSession, ScanWarning,
};

use crate::error::ReportError;

const RULE_WIDTH: usize = 60;
const SECTION_WIDTH: usize = 50;
const DEFAULT_NAME_WIDTH: usize = 30;

/// Renders a session into report text or JSON.
#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    name_width: usize,
}

impl ReportRenderer {
    /// Create a renderer with the default folder-name column width.
    pub fn new() -> Self {
        Self {
            name_width: DEFAULT_NAME_WIDTH,
        }
    }

    /// Set the width the folder-name column is padded to.
    pub fn with_name_width(mut self, width: usize) -> Self {
        self.name_width = width;
        self
    }

    /// Render the plain-text report.
    pub fn render_text(&self, session: &ScanSession) -> String {
        self.text(session).to_string()
    }

    /// Displayable text report borrowing the session.
    pub fn text<'a>(&self, session: &'a ScanSession) -> TextReport<'a> {
        TextReport {
            session,
            name_width: self.name_width,
        }
    }

    /// Render the JSON summary.
    pub fn render_json(&self, session: &ScanSession) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(&ScanSummary::from_session(session))?)
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-text report of a session.
pub struct TextReport<'a> {
    session: &'a ScanSession,
    name_width: usize,
}

impl TextReport<'_> {
    fn write_event(&self, f: &mut fmt::Formatter<'_>, event: &ClassificationEvent) -> fmt::Result {
        let marker = match event.status {
            FolderStatus::Valid => "[VALID]",
            FolderStatus::Obsolete => "[OBSOLETE]",
        };
        writeln!(
            f,
            "  {marker:<10} {name:<width$} | last modified: {date}",
            name = event.folder_name.as_str(),
            width = self.name_width,
            date = event.last_modified,
        )
    }

    fn write_warnings(&self, f: &mut fmt::Formatter<'_>, warnings: &[ScanWarning]) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "SKIPPED PATHS (could not be inspected)")?;
        for warning in warnings {
            writeln!(
                f,
                "  [{}] {}: {}",
                warning.kind.label(),
                warning.path.display(),
                warning.message
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let rule = "=".repeat(RULE_WIDTH);
        let section = "-".repeat(SECTION_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "BACKUP AGE ANALYSIS")?;
        writeln!(f, "Root folder     : {}", session.root().display())?;
        writeln!(f, "Scan date       : {}", session.scan_date())?;
        writeln!(f, "Obsolete before : {}", session.cutoff())?;
        writeln!(f, "{rule}")?;

        for record in session.records() {
            match record {
                ScanRecord::Root { path } => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy())
                        .unwrap_or_else(|| path.to_string_lossy());
                    writeln!(f)?;
                    writeln!(f, "Backup root detected: {name} ({})", path.display())?;
                    writeln!(f, "{section}")?;
                }
                ScanRecord::Group { name, kind } => {
                    let label = match kind {
                        GroupKind::Archive => "Backup folder",
                        GroupKind::Parent => "Parent folder",
                    };
                    writeln!(f)?;
                    writeln!(f, "{label}: {name}")?;
                    writeln!(f, "{section}")?;
                }
                ScanRecord::Classified { index } => {
                    if let Some(event) = session.events().get(*index) {
                        self.write_event(f, event)?;
                    }
                }
            }
        }
        writeln!(f)?;

        if session.has_warnings() {
            self.write_warnings(f, session.warnings())?;
        }

        writeln!(f, "{rule}")?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "Folders analyzed : {}", session.total_analyzed())?;
        writeln!(f, "Obsolete folders : {}", session.total_obsolete())?;
        writeln!(f, "Valid folders    : {}", session.total_valid())?;
        writeln!(f, "{rule}")
    }
}

/// Serializable view of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary<'a> {
    /// Root path of the scan.
    pub root: &'a Path,
    /// Date the scan ran.
    pub scan_date: NaiveDate,
    /// Folders modified before this date are obsolete.
    pub cutoff: NaiveDate,
    /// Number of folders classified.
    pub total_analyzed: u64,
    /// Number of obsolete folders.
    pub total_obsolete: u64,
    /// Number of valid folders.
    pub total_valid: u64,
    /// Classification events in scan order.
    pub events: &'a [ClassificationEvent],
    /// Paths that could not be inspected.
    pub warnings: &'a [ScanWarning],
}

impl<'a> ScanSummary<'a> {
    /// Build a summary view of a session.
    pub fn from_session(session: &'a ScanSession) -> Self {
        Self {
            root: session.root(),
            scan_date: session.scan_date(),
            cutoff: session.cutoff(),
            total_analyzed: session.total_analyzed(),
            total_obsolete: session.total_obsolete(),
            total_valid: session.total_valid(),
            events: session.events(),
            warnings: session.warnings(),
        }
    }
}

/// Write rendered report contents, creating parent directories as needed.
pub fn write_report(path: impl AsRef<Path>, contents: &str) -> Result<(), ReportError> {
    let path = path.as_ref();
    let write_err = |source| ReportError::Write {
        path: PathBuf::from(path),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    std::fs::write(path, contents).map_err(write_err)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}
