//! Core types for backwatch.
//!
//! This crate holds the data model shared by the scanning engine and the
//! reporting side: scan configuration, the per-run [`ScanSession`], the
//! exclusion rules and the error/warning taxonomy.

mod config;
mod error;
mod filter;
mod session;

pub use config::{
    DEFAULT_ARCHIVE_SUFFIX, DEFAULT_EXCLUDED_NAMES, DEFAULT_EXCLUDED_PREFIX, DEFAULT_MAX_DEPTH,
    DEFAULT_SENTINEL_NAME, DEFAULT_THRESHOLD_YEARS, ScanConfig, ScanConfigBuilder,
};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use filter::PathFilter;
pub use session::{
    ClassificationEvent, FolderStatus, GroupKind, ScanRecord, ScanSession, cutoff_date,
};
