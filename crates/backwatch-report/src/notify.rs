//! Delivery of a rendered report through a notification channel.
//!
//! Channels are synchronous and run once per scan, after the report has been
//! written. A failed delivery is returned to the caller; it never affects the
//! report itself.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Line length for base64 bodies (RFC 2045).
const BASE64_LINE_LEN: usize = 76;

/// Which channel delivers the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Drop the report into an outbox directory.
    #[default]
    Outbox,
    /// Pipe a MIME message to a sendmail-compatible command.
    Sendmail,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outbox => write!(f, "outbox"),
            Self::Sendmail => write!(f, "sendmail"),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotifyConfig {
    /// Master switch.
    pub enabled: bool,
    /// Channel used for delivery.
    pub channel: ChannelKind,
    /// Sender address.
    pub from: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Message subject.
    pub subject: String,
    /// Message body accompanying the attachment.
    pub body: String,
    /// Target directory for the outbox channel.
    pub outbox_dir: PathBuf,
    /// Program and arguments for the sendmail channel.
    pub sendmail_command: Vec<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel: ChannelKind::Outbox,
            from: String::new(),
            to: Vec::new(),
            subject: "Backup analysis report".to_string(),
            body: "Please find attached the backup analysis report.".to_string(),
            outbox_dir: PathBuf::from("outbox"),
            sendmail_command: vec!["/usr/sbin/sendmail".to_string(), "-t".to_string()],
        }
    }
}

/// A rendered report ready to hand to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPayload {
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// File name of the attachment.
    pub attachment_name: String,
    /// Attachment contents.
    pub attachment: Vec<u8>,
}

impl ReportPayload {
    /// Create a payload.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        attachment_name: impl Into<String>,
        attachment: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            attachment_name: attachment_name.into(),
            attachment: attachment.into(),
        }
    }
}

/// A channel that can deliver a report payload.
pub trait Notifier {
    /// Channel name for logs and errors.
    fn name(&self) -> &'static str;

    /// Deliver the payload.
    fn deliver(&self, payload: &ReportPayload) -> Result<(), ReportError>;
}

// ──── Outbox directory ────

/// Writes the attachment into a directory for an external mailer to pick up.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    /// Create an outbox channel targeting `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File name used for a payload: timestamp prefix plus attachment name.
    fn file_name(payload: &ReportPayload) -> String {
        format!(
            "{}-{}",
            Local::now().format("%Y%m%d-%H%M%S"),
            payload.attachment_name
        )
    }
}

impl Notifier for OutboxNotifier {
    fn name(&self) -> &'static str {
        "outbox"
    }

    fn deliver(&self, payload: &ReportPayload) -> Result<(), ReportError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ReportError::delivery(self.name(), format!("{}: {e}", self.dir.display())))?;

        let target = self.dir.join(Self::file_name(payload));
        std::fs::write(&target, &payload.attachment)
            .map_err(|e| ReportError::delivery(self.name(), format!("{}: {e}", target.display())))?;

        tracing::info!(path = %target.display(), "report dropped in outbox");
        Ok(())
    }
}

// ──── sendmail pipe ────

/// Pipes a MIME message with the report attached to a sendmail-compatible
/// program (`sendmail -t` reads recipients from the headers).
#[derive(Debug, Clone)]
pub struct SendmailNotifier {
    command: Vec<String>,
    from: String,
    to: Vec<String>,
}

impl SendmailNotifier {
    /// Create a sendmail channel.
    pub fn new(command: Vec<String>, from: impl Into<String>, to: Vec<String>) -> Self {
        Self {
            command,
            from: from.into(),
            to,
        }
    }
}

impl Notifier for SendmailNotifier {
    fn name(&self) -> &'static str {
        "sendmail"
    }

    fn deliver(&self, payload: &ReportPayload) -> Result<(), ReportError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| ReportError::delivery(self.name(), "empty command"))?;

        let boundary = format!("=_backwatch_{}", Local::now().timestamp_micros());
        let message = build_mime_message(&self.from, &self.to, payload, &boundary);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| ReportError::delivery(self.name(), format!("failed to run {program}: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(message.as_bytes()) {
                drop(stdin);
                // Reap the child before bailing out.
                let _ = child.wait();
                return Err(ReportError::delivery(self.name(), format!("write failed: {e}")));
            }
        }

        let status = child
            .wait()
            .map_err(|e| ReportError::delivery(self.name(), e.to_string()))?;
        if !status.success() {
            return Err(ReportError::delivery(
                self.name(),
                format!("{program} exited with {status}"),
            ));
        }

        tracing::info!(recipients = self.to.len(), "report mailed");
        Ok(())
    }
}

/// Build a `multipart/mixed` message: a plain-text body plus the report as a
/// base64 attachment.
pub fn build_mime_message(
    from: &str,
    to: &[String],
    payload: &ReportPayload,
    boundary: &str,
) -> String {
    let mut message = String::new();
    message.push_str(&format!("From: {from}\r\n"));
    message.push_str(&format!("To: {}\r\n", to.join(", ")));
    message.push_str(&format!("Subject: {}\r\n", encode_header(&payload.subject)));
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str(&format!(
        "Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\r\n"
    ));

    message.push_str(&format!("--{boundary}\r\n"));
    message.push_str("Content-Type: text/plain; charset=utf-8\r\n");
    message.push_str("Content-Transfer-Encoding: 8bit\r\n\r\n");
    message.push_str(&payload.body);
    message.push_str("\r\n\r\n");

    let name = &payload.attachment_name;
    message.push_str(&format!("--{boundary}\r\n"));
    message.push_str(&format!(
        "Content-Type: application/octet-stream; name=\"{name}\"\r\n"
    ));
    message.push_str("Content-Transfer-Encoding: base64\r\n");
    message.push_str(&format!(
        "Content-Disposition: attachment; filename=\"{name}\"\r\n\r\n"
    ));
    let encoded = STANDARD.encode(&payload.attachment);
    for chunk in encoded.as_bytes().chunks(BASE64_LINE_LEN) {
        // base64 output is ASCII
        message.push_str(&String::from_utf8_lossy(chunk));
        message.push_str("\r\n");
    }
    message.push_str(&format!("--{boundary}--\r\n"));
    message
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?utf-8?B?{}?=", STANDARD.encode(value))
    }
}

/// Build the configured channel, or `None` when notifications are disabled.
pub fn notifier_from_config(config: &NotifyConfig) -> Result<Option<Box<dyn Notifier>>, ReportError> {
    if !config.enabled {
        return Ok(None);
    }

    let notifier: Box<dyn Notifier> = match config.channel {
        ChannelKind::Outbox => {
            if config.outbox_dir.as_os_str().is_empty() {
                return Err(ReportError::InvalidConfig {
                    message: "outbox channel requires outbox_dir".to_string(),
                });
            }
            Box::new(OutboxNotifier::new(config.outbox_dir.clone()))
        }
        ChannelKind::Sendmail => {
            if config.to.is_empty() {
                return Err(ReportError::InvalidConfig {
                    message: "sendmail channel requires at least one recipient".to_string(),
                });
            }
            if config.sendmail_command.is_empty() {
                return Err(ReportError::InvalidConfig {
                    message: "sendmail channel requires a command".to_string(),
                });
            }
            Box::new(SendmailNotifier::new(
                config.sendmail_command.clone(),
                config.from.clone(),
                config.to.clone(),
            ))
        }
    };
    Ok(Some(notifier))
}
