//! Depth-bounded recursive walk over the backup volume.

use std::path::Path;

use backwatch_core::{PathFilter, ScanSession, ScanWarning};

use crate::fs::{list_dir, record_warning};
use crate::sentinel::SentinelDetector;

/// Drives the traversal: every visited directory is checked for the sentinel
/// marker, then its non-excluded subdirectories are visited one level deeper.
///
/// The root is depth 0. A directory at exactly `max_depth` is still checked
/// but not descended into.
#[derive(Debug, Clone, Copy)]
pub struct RecursiveWalker<'a> {
    filter: &'a PathFilter,
    detector: SentinelDetector<'a>,
    max_depth: u32,
}

impl<'a> RecursiveWalker<'a> {
    /// Create a walker.
    pub fn new(filter: &'a PathFilter, detector: SentinelDetector<'a>, max_depth: u32) -> Self {
        Self {
            filter,
            detector,
            max_depth,
        }
    }

    /// Walk the tree below `root`.
    pub fn walk(&self, session: &mut ScanSession, root: &Path) {
        self.visit(session, root, 0);
    }

    fn visit(&self, session: &mut ScanSession, path: &Path, depth: u32) {
        tracing::debug!(path = %path.display(), depth, "visiting directory");

        // One listing serves both the sentinel check and the descent.
        let entries = match list_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                record_warning(session, ScanWarning::listing(path, &err));
                return;
            }
        };

        self.detector.dispatch(session, path, &entries);

        if depth >= self.max_depth {
            return;
        }

        for entry in &entries {
            if self.filter.should_skip(&entry.name) || !entry.is_dir() {
                continue;
            }
            self.visit(session, &entry.path, depth + 1);
        }
    }
}
