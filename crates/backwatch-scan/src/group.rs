//! Resolution of a backup group into the folders to classify.

use std::path::Path;

use backwatch_core::{GroupKind, PathFilter, ScanSession, ScanWarning};

use crate::classify::FolderClassifier;
use crate::fs::{list_dir, record_warning};

/// Recognizes the two on-disk shapes of a backup group.
///
/// A group whose name ends in the archive suffix is one backup unit and is
/// classified directly. Any other group is a parent holding one backup per
/// immediate subdirectory.
#[derive(Debug, Clone, Copy)]
pub struct BackupGroupResolver<'a> {
    filter: &'a PathFilter,
    archive_suffix: &'a str,
    classifier: FolderClassifier,
}

impl<'a> BackupGroupResolver<'a> {
    /// Create a resolver.
    pub fn new(filter: &'a PathFilter, archive_suffix: &'a str) -> Self {
        Self {
            filter,
            archive_suffix,
            classifier: FolderClassifier::new(),
        }
    }

    /// Classify the backup units of the group at `parent`.
    ///
    /// Listing and metadata failures are recorded as warnings; siblings are
    /// still classified.
    pub fn resolve_group(&self, session: &mut ScanSession, parent: &Path) {
        let name = parent
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if name.ends_with(self.archive_suffix) {
            if session.is_classified(parent) {
                tracing::debug!(path = %parent.display(), "backup unit already classified");
                return;
            }
            session.enter_group(&name, GroupKind::Archive);
            self.classify_or_warn(session, parent);
            return;
        }

        session.enter_group(&name, GroupKind::Parent);
        let entries = match list_dir(parent) {
            Ok(entries) => entries,
            Err(err) => {
                record_warning(session, ScanWarning::listing(parent, &err));
                return;
            }
        };

        for entry in entries {
            if self.filter.should_skip(&entry.name) || !entry.is_dir() {
                continue;
            }
            self.classify_or_warn(session, &entry.path);
        }
    }

    fn classify_or_warn(&self, session: &mut ScanSession, path: &Path) {
        let Err(err) = self.classifier.classify(session, path) else {
            return;
        };
        match ScanWarning::from_access(&err) {
            Some(warning) => record_warning(session, warning),
            None => tracing::error!(path = %path.display(), error = %err, "classification failed"),
        }
    }
}
