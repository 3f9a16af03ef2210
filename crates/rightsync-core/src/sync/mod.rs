//! Sync orchestration: one login, one listing, then every resource in order.

mod orchestrator;
mod report;

pub use orchestrator::Orchestrator;
pub use report::{Failure, ResourceStep, SyncReport};

use crate::config::RightsyncConfig;
use crate::control::AbortToken;
use crate::error::SyncError;
use crate::options::SyncOptions;
use crate::session::{Endpoints, Session};
use crate::storage::StorageWriter;
use crate::transport::CurlTransport;

/// Build the curl-backed session from `config` and run one full sync.
pub fn run_sync(
    options: &SyncOptions,
    config: &RightsyncConfig,
    abort: AbortToken,
) -> Result<SyncReport, SyncError> {
    let endpoints = Endpoints::new(&config.base_url, &options.account_id)
        .map_err(SyncError::Setup)?;
    let transport = CurlTransport::new(&config.curl_options(), abort.clone())
        .map_err(|e| SyncError::Setup(anyhow::Error::new(e).context("init HTTP client")))?;
    let session = Session::new(
        transport,
        endpoints,
        &config.api_version,
        config.retry_policy(),
    );
    let writer = StorageWriter::new(options.dry_run);

    tracing::debug!(?options, base_url = %config.base_url, "starting sync");
    Orchestrator::new(session, writer, &options.output_path, abort)
        .run(&options.username, &options.password)
}
