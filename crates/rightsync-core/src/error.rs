//! Run-level error types.
//!
//! Only configuration, setup and authentication failures end a run with a failing
//! exit status. Per-resource and per-attachment failures never surface here;
//! they are logged and recorded in the [`crate::sync::SyncReport`].

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0} argument")]
    MissingArgument(&'static str),
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// The transport or endpoint layout could not be built.
    #[error("setup failed: {0:#}")]
    Setup(anyhow::Error),

    /// The login request failed or was rejected.
    #[error("authentication failed: {0}")]
    Authentication(#[source] TransportError),

    /// The resource listing could not be fetched or parsed.
    #[error("could not list resources: {0:#}")]
    Listing(anyhow::Error),

    /// The abort token was tripped.
    #[error("interrupted")]
    Interrupted,
}

impl SyncError {
    /// Whether the process should exit with a failing status.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Setup(_) | SyncError::Authentication(_))
    }
}
