//! CLI for rightsync.

mod signal;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use rightsync_core::config;
use rightsync_core::control::AbortToken;
use rightsync_core::error::SyncError;
use rightsync_core::options::{RawOptions, SyncOptions};
use rightsync_core::sync;
use std::path::PathBuf;
use std::process::ExitCode;

const VERSION_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCopyright (C) ",
    env!("CARGO_PKG_AUTHORS"),
    "\nLicense ",
    env!("CARGO_PKG_LICENSE"),
);

/// Mirror a RightScript catalog (scripts, metadata and attachments) to disk.
#[derive(Debug, Parser)]
#[command(name = "rightsync", version = VERSION_NOTICE, long_version = VERSION_NOTICE)]
#[command(
    about = "rightsync: incremental mirror of a RightScript catalog",
    long_about = None
)]
pub struct Cli {
    /// Log what would be stored without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Root directory for stored resources.
    #[arg(long, value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Account whose catalog is mirrored.
    #[arg(long, value_name = "ID")]
    pub account_id: Option<String>,

    /// Dashboard login.
    #[arg(long, value_name = "USER")]
    pub username: Option<String>,

    /// Dashboard password.
    #[arg(long, value_name = "PASS")]
    pub password: Option<String>,

    /// Config file to use instead of `$XDG_CONFIG_HOME/rightsync/config.toml`.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn raw_options(&self) -> RawOptions {
        RawOptions {
            dry_run: self.dry_run,
            output_path: self.output_path.clone(),
            account_id: self.account_id.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Parse arguments, run one sync, and map the outcome to an exit status.
pub fn run_from_args() -> Result<ExitCode> {
    let cli = Cli::parse();

    let options = match SyncOptions::validate(cli.raw_options()) {
        Ok(options) => options,
        Err(missing) => {
            for err in &missing {
                eprintln!("{}", err);
            }
            eprintln!();
            eprintln!("{}", Cli::command().render_help());
            return Ok(ExitCode::FAILURE);
        }
    };

    let cfg = match &cli.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);

    let abort = AbortToken::new();
    signal::install(&abort);

    Ok(ExitCode::from(exit_status(sync::run_sync(&options, &cfg, abort))))
}

/// 1 for setup and authentication failures, 0 for everything else
/// (including interrupts and per-item failures).
fn exit_status(outcome: Result<sync::SyncReport, SyncError>) -> u8 {
    match outcome {
        Ok(report) => {
            if report.has_failures() {
                tracing::warn!(
                    "{} item(s) failed; see the log above for details",
                    report.failures.len()
                );
            }
            0
        }
        Err(SyncError::Interrupted) => 0,
        Err(err) if err.is_fatal() => {
            tracing::error!("{}", err);
            1
        }
        Err(err) => {
            tracing::error!("{}", err);
            0
        }
    }
}
