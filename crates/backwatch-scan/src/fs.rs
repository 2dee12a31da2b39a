//! Directory listing helpers shared by the engine components.

use std::io;
use std::path::{Path, PathBuf};

use backwatch_core::{ScanSession, ScanWarning};

/// One raw entry of a directory listing.
#[derive(Debug, Clone)]
pub(crate) struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
}

impl DirEntryInfo {
    /// Whether the entry is a directory, following symlinks.
    pub fn is_dir(&self) -> bool {
        self.path.is_dir()
    }
}

/// List the immediate entries of a directory, sorted by name.
pub(crate) fn list_dir(path: &Path) -> io::Result<Vec<DirEntryInfo>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.path(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Log a warning and store it on the session.
pub(crate) fn record_warning(session: &mut ScanSession, warning: ScanWarning) {
    tracing::warn!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
    session.warn(warning);
}
