//! Backup folder traversal and classification engine for backwatch.
//!
//! The engine walks a backup volume depth-first and classifies every backup
//! folder it recognizes as valid or obsolete. Data flows one way:
//!
//! ```text
//! RecursiveWalker -> SentinelDetector -> BackupGroupResolver -> FolderClassifier -> ScanSession
//! ```
//!
//! - **RecursiveWalker** visits directories up to the configured depth.
//! - **SentinelDetector** looks for the marker entry (`@eaDir` by default) in a
//!   visited directory and, when present, hands each subdirectory on as a group.
//! - **BackupGroupResolver** classifies a group directly when its name carries
//!   the archive suffix (`.hbk`), otherwise classifies each of its subdirectories.
//! - **FolderClassifier** compares a folder's modification date to the cutoff.
//!
//! Access failures never abort the scan; they are recorded as warnings on the
//! session and the affected subtree is skipped.
//!
//! # Example
//!
//! ```rust,no_run
//! use backwatch_scan::{BackupScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/volume1");
//! let scanner = BackupScanner::new(config).unwrap();
//! let session = scanner.scan().unwrap();
//!
//! println!("{} analyzed, {} obsolete", session.total_analyzed(), session.total_obsolete());
//! ```

mod classify;
mod fs;
mod group;
mod scanner;
mod sentinel;
mod walker;

pub use classify::{FolderClassifier, modified_date};
pub use group::BackupGroupResolver;
pub use scanner::BackupScanner;
pub use sentinel::SentinelDetector;
pub use walker::RecursiveWalker;

// Re-export core types for convenience
pub use backwatch_core::{
    ClassificationEvent, FolderStatus, GroupKind, PathFilter, ScanConfig, ScanError, ScanRecord,
    ScanSession, ScanWarning, WarningKind,
};
