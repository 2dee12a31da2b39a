//! Error types for report rendering and delivery.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from writing or delivering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be written.
    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON summary could not be produced.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A notification channel failed to deliver.
    #[error("Notification channel '{channel}' failed: {message}")]
    Delivery {
        channel: &'static str,
        message: String,
    },

    /// Notification settings are incomplete or inconsistent.
    #[error("Invalid notification configuration: {message}")]
    InvalidConfig { message: String },
}

impl ReportError {
    /// Create a delivery error for a channel.
    pub fn delivery(channel: &'static str, message: impl Into<String>) -> Self {
        Self::Delivery {
            channel,
            message: message.into(),
        }
    }
}
