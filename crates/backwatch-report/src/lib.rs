//! Report rendering and delivery for backwatch.
//!
//! This crate consumes a finished [`ScanSession`] read-only:
//!
//! - **Rendering** - a plain-text report (header, one line per classified
//!   folder grouped by backup root and group, skipped paths, totals) or a
//!   JSON summary.
//! - **Delivery** - a [`Notifier`] hands the rendered report on as an
//!   attachment, either into an outbox directory or through a
//!   sendmail-compatible command.
//!
//! ```rust,ignore
//! use backwatch_report::{ReportRenderer, write_report};
//! use backwatch_scan::{BackupScanner, ScanConfig};
//!
//! let session = BackupScanner::new(ScanConfig::new("/volume1"))?.scan()?;
//! let text = ReportRenderer::new().render_text(&session);
//! write_report("backup_report.txt", &text)?;
//! ```

mod error;
pub mod notify;
mod render;

pub use error::ReportError;
pub use notify::{
    ChannelKind, Notifier, NotifyConfig, OutboxNotifier, ReportPayload, SendmailNotifier,
    build_mime_message, notifier_from_config,
};
pub use render::{ReportRenderer, ScanSummary, TextReport, write_report};

// Re-export core types
pub use backwatch_core::{ClassificationEvent, FolderStatus, ScanSession, ScanWarning};
