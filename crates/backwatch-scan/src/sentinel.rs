//! Detection of directories that hold backup groups.

use std::path::Path;

use backwatch_core::{PathFilter, ScanSession, ScanWarning};

use crate::fs::{DirEntryInfo, list_dir, record_warning};
use crate::group::BackupGroupResolver;

/// Checks a candidate directory for the sentinel marker and dispatches its
/// subdirectories as backup groups.
///
/// The marker is looked up in the raw listing; it is itself an excluded name
/// and never becomes a group.
#[derive(Debug, Clone, Copy)]
pub struct SentinelDetector<'a> {
    filter: &'a PathFilter,
    sentinel_name: &'a str,
    resolver: BackupGroupResolver<'a>,
}

impl<'a> SentinelDetector<'a> {
    /// Create a detector.
    pub fn new(
        filter: &'a PathFilter,
        sentinel_name: &'a str,
        resolver: BackupGroupResolver<'a>,
    ) -> Self {
        Self {
            filter,
            sentinel_name,
            resolver,
        }
    }

    /// List `candidate` and dispatch its groups if the marker is present.
    ///
    /// Returns whether the candidate was a backup-holding root.
    pub fn check_and_dispatch(&self, session: &mut ScanSession, candidate: &Path) -> bool {
        match list_dir(candidate) {
            Ok(entries) => self.dispatch(session, candidate, &entries),
            Err(err) => {
                record_warning(session, ScanWarning::listing(candidate, &err));
                false
            }
        }
    }

    /// Dispatch using a listing the caller already holds.
    pub(crate) fn dispatch(
        &self,
        session: &mut ScanSession,
        candidate: &Path,
        entries: &[DirEntryInfo],
    ) -> bool {
        if !entries.iter().any(|e| e.name == self.sentinel_name) {
            return false;
        }

        tracing::info!(
            path = %candidate.display(),
            sentinel = self.sentinel_name,
            "backup root detected"
        );
        session.enter_root(candidate);

        for entry in entries {
            if self.filter.should_skip(&entry.name) || !entry.is_dir() {
                continue;
            }
            self.resolver.resolve_group(session, &entry.path);
        }
        true
    }
}
