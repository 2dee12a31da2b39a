//! Age classification of a single backup folder.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate};

use backwatch_core::{ClassificationEvent, ScanError, ScanSession};

/// Convert a modification time to its local calendar date.
pub fn modified_date(time: SystemTime) -> NaiveDate {
    DateTime::<Local>::from(time).date_naive()
}

/// Reads a folder's modification date and records its status on the session.
///
/// A folder already classified in the session is skipped, so a backup reached
/// both as a parent's child and as its own group is counted once.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderClassifier;

impl FolderClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify the folder at `path`.
    ///
    /// Returns `Ok(None)` if the folder was already classified. Fails with an
    /// access error when the metadata cannot be read; the session is left
    /// untouched in that case.
    pub fn classify(
        &self,
        session: &mut ScanSession,
        path: &Path,
    ) -> Result<Option<ClassificationEvent>, ScanError> {
        if session.is_classified(path) {
            tracing::debug!(path = %path.display(), "already classified");
            return Ok(None);
        }

        let metadata = std::fs::metadata(path).map_err(|e| ScanError::io(path, e))?;
        let modified = metadata.modified().map_err(|e| ScanError::io(path, e))?;

        let Some(event) = session.record(path, modified_date(modified)).cloned() else {
            return Ok(None);
        };
        tracing::debug!(
            path = %path.display(),
            last_modified = %event.last_modified,
            status = %event.status,
            "classified backup folder"
        );
        Ok(Some(event))
    }
}
