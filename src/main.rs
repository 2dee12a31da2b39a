//! backwatch - Report backup folders that have not changed in a long time.
//!
//! Usage:
//!   backwatch -r /volume1              Scan and write backup_report.txt
//!   backwatch -r /volume1 -y 3 -d 4    Custom age threshold and depth
//!   backwatch -f json --stdout         Print the JSON summary
//!   backwatch --help                   Show help

mod config;
mod logging;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};

use backwatch_report::{ReportPayload, ReportRenderer, notifier_from_config, write_report};
use backwatch_scan::BackupScanner;

use crate::config::{AppConfig, DEFAULT_REPORT_FILE, Overrides};

#[derive(Parser)]
#[command(
    name = "backwatch",
    version,
    about = "Find backup folders that have not been modified recently",
    long_about = "backwatch walks a backup volume, finds directories marked by an \
                  @eaDir entry, and classifies each backup folder as valid or \
                  obsolete by its last modification date."
)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder to scan
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Folders older than this many years are obsolete
    #[arg(short = 'y', long = "years")]
    years: Option<u32>,

    /// Maximum depth to walk below the root
    #[arg(short, long)]
    depth: Option<u32>,

    /// Extra folder name to exclude (repeatable)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Report file path
    #[arg(short = 'o', long = "report")]
    report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Print the report instead of writing it to a file
    #[arg(long)]
    stdout: bool,

    /// Skip report delivery even if enabled in the config
    #[arg(long)]
    no_notify: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config = AppConfig::resolve(cli.config.as_deref())
        .context("Failed to load configuration")?
        .apply(Overrides {
            root: cli.root,
            threshold_years: cli.years,
            max_depth: cli.depth,
            extra_excludes: cli.exclude,
            report_path: cli.report,
            no_notify: cli.no_notify,
        })
        .context("Invalid configuration")?;

    run(&config, cli.format, cli.stdout)
}

/// Scan, render, write and deliver the report.
fn run(config: &AppConfig, format: OutputFormat, to_stdout: bool) -> Result<()> {
    eprintln!("Scanning {}...", config.scan.root.display());

    let scanner = BackupScanner::new(config.scan.clone()).context("Invalid scan settings")?;
    let session = scanner.scan().context("Scan failed")?;

    let renderer = ReportRenderer::new();
    let contents = match format {
        OutputFormat::Text => renderer.render_text(&session),
        OutputFormat::Json => renderer.render_json(&session)?,
    };

    if to_stdout {
        print!("{contents}");
    } else {
        write_report(&config.report.path, &contents).context("Failed to write report")?;
        eprintln!("Report written to {}", config.report.path.display());
    }

    eprintln!(
        "{} folders analyzed, {} obsolete, {} valid",
        session.total_analyzed(),
        session.total_obsolete(),
        session.total_valid()
    );
    if session.has_warnings() {
        eprintln!("{} path(s) could not be inspected", session.warnings().len());
    }

    if let Some(notifier) = notifier_from_config(&config.notify)? {
        let attachment_name = config
            .report
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_REPORT_FILE.to_string());
        let payload = ReportPayload::new(
            config.notify.subject.clone(),
            config.notify.body.clone(),
            attachment_name,
            contents,
        );
        if let Err(err) = notifier.deliver(&payload) {
            tracing::error!(channel = notifier.name(), error = %err, "report delivery failed");
            return Err(err)
                .with_context(|| format!("Report delivery via {} failed", notifier.name()));
        }
        eprintln!("Report delivered via {}", notifier.name());
    }

    Ok(())
}
