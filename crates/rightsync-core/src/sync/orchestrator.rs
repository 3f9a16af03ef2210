//! Sequential sync of every listed resource version.
//!
//! Per resource: write the script and metadata, fetch the attachment table,
//! then store each attachment whose local copy is missing or stale. A failure
//! inside one resource (or one attachment) is logged and recorded in the
//! report; the run moves on to the next item.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use super::report::{Failure, ResourceStep, SyncReport};
use crate::change;
use crate::checksum;
use crate::control::AbortToken;
use crate::error::SyncError;
use crate::extract;
use crate::model::{Attachment, Resource};
use crate::paths;
use crate::session::Session;
use crate::storage::StorageWriter;
use crate::timestamp::parse_remote_time;
use crate::transport::{Transport, TransportError};

enum AttachmentOutcome {
    Stored,
    UpToDate,
}

/// Resource-level failure tagged with the step it happened in.
struct StepFailure {
    step: ResourceStep,
    error: anyhow::Error,
}

impl StepFailure {
    fn at(step: ResourceStep) -> impl FnOnce(anyhow::Error) -> StepFailure {
        move |error| StepFailure { step, error }
    }
}

pub struct Orchestrator<T> {
    session: Session<T>,
    writer: StorageWriter,
    output_root: PathBuf,
    abort: AbortToken,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(
        session: Session<T>,
        writer: StorageWriter,
        output_root: impl Into<PathBuf>,
        abort: AbortToken,
    ) -> Self {
        Self {
            session,
            writer,
            output_root: output_root.into(),
            abort,
        }
    }

    /// Log in, list, and store every resource.
    ///
    /// Errors only for a failed login, an unusable listing, or an abort; all
    /// per-item failures end up in the returned report.
    pub fn run(&mut self, username: &str, password: &str) -> Result<SyncReport, SyncError> {
        if self.writer.is_dry_run() {
            tracing::info!(
                "dry run: nothing will be written under {}",
                self.output_root.display()
            );
        }

        self.session.login(username, password).map_err(|e| match e {
            TransportError::Aborted => SyncError::Interrupted,
            e => SyncError::Authentication(e),
        })?;

        tracing::info!("Downloading RightScripts");
        let resources = self.list_resources()?;
        let mut report = SyncReport {
            resources_listed: resources.len(),
            ..SyncReport::default()
        };

        for resource in &resources {
            self.check_abort()?;
            let span =
                tracing::info_span!("resource", id = resource.id, version = resource.version);
            let _enter = span.enter();

            match self.sync_resource(resource, &mut report) {
                Ok(()) => report.resources_synced += 1,
                Err(failure) => {
                    self.check_abort()?;
                    tracing::error!(
                        "failed {} for '{}': {:?}",
                        failure.step,
                        resource.name,
                        failure.error
                    );
                    report.resources_failed += 1;
                    report.failures.push(Failure {
                        resource_id: resource.id,
                        version: resource.version,
                        step: failure.step,
                        attachment: None,
                        message: format!("{:#}", failure.error),
                    });
                }
            }
        }

        tracing::info!("{}", report);
        Ok(report)
    }

    fn check_abort(&self) -> Result<(), SyncError> {
        if self.abort.is_aborted() {
            tracing::info!("interrupted, stopping");
            return Err(SyncError::Interrupted);
        }
        Ok(())
    }

    fn list_resources(&mut self) -> Result<Vec<Resource>, SyncError> {
        let xml = self.session.listing_document().map_err(|e| match e {
            TransportError::Aborted => SyncError::Interrupted,
            e => SyncError::Listing(anyhow::Error::new(e).context("fetch resource listing")),
        })?;
        let resources = extract::parse_listing(&xml).map_err(SyncError::Listing)?;
        tracing::debug!(count = resources.len(), "listing parsed");
        Ok(resources)
    }

    fn sync_resource(
        &mut self,
        resource: &Resource,
        report: &mut SyncReport,
    ) -> Result<(), StepFailure> {
        tracing::info!("Storing RightScript ({})", resource.name);

        let dir = paths::resource_dir(&self.output_root, resource);
        let script = paths::script_path(&dir);
        self.writer
            .write_content(&script, resource.content.as_bytes())
            .and_then(|()| self.stamp(&script, &resource.updated_at, &resource.created_at))
            .map_err(StepFailure::at(ResourceStep::StoringScript))?;
        self.writer
            .write_metadata(&paths::metadata_path(&dir), resource)
            .map_err(StepFailure::at(ResourceStep::StoringMetadata))?;

        let fragment = self
            .session
            .attachment_fragment(resource.id)
            .map_err(anyhow::Error::new)
            .map_err(StepFailure::at(ResourceStep::Fetching))?;
        let attachments = extract::parse_attachment_fragment(&fragment);

        let attachment_dir = paths::attachment_dir(&dir);
        tracing::info!(
            "Storing RightScript attachments for '{}' to {}",
            resource.name,
            attachment_dir.display()
        );
        for attachment in &attachments {
            if self.abort.is_aborted() {
                return Err(StepFailure {
                    step: ResourceStep::StoringAttachments,
                    error: anyhow!("interrupted"),
                });
            }
            match self.sync_attachment(attachment, &attachment_dir) {
                Ok(AttachmentOutcome::Stored) => report.attachments_downloaded += 1,
                Ok(AttachmentOutcome::UpToDate) => report.attachments_skipped += 1,
                Err(error) => {
                    if self.abort.is_aborted() {
                        return Err(StepFailure {
                            step: ResourceStep::StoringAttachments,
                            error,
                        });
                    }
                    tracing::error!(
                        "failed to store attachment '{}': {:?}",
                        attachment.filename,
                        error
                    );
                    report.attachments_failed += 1;
                    report.failures.push(Failure {
                        resource_id: resource.id,
                        version: resource.version,
                        step: ResourceStep::StoringAttachments,
                        attachment: Some(attachment.filename.clone()),
                        message: format!("{:#}", error),
                    });
                }
            }
        }
        Ok(())
    }

    fn sync_attachment(
        &mut self,
        attachment: &Attachment,
        dir: &Path,
    ) -> Result<AttachmentOutcome> {
        tracing::info!(
            "Storing RightScript attachment '{}' ({}) {}",
            attachment.filename,
            attachment.size,
            attachment.updated_at
        );
        let path = paths::attachment_path(dir, attachment)?;
        if !change::should_download(attachment, &path)? {
            return Ok(AttachmentOutcome::UpToDate);
        }
        if self.writer.is_dry_run() {
            tracing::info!("dry run: would download {} to {}", attachment.uri, path.display());
            return Ok(AttachmentOutcome::Stored);
        }

        let body = self
            .session
            .download(&attachment.uri)
            .with_context(|| format!("download {}", attachment.filename))?;
        let digest = checksum::md5_bytes(&body);
        if !digest.eq_ignore_ascii_case(attachment.content_hash.trim()) {
            tracing::warn!(
                "md5 of downloaded '{}' is {} but dashboard reports {}",
                attachment.filename,
                digest,
                attachment.content_hash
            );
        }
        self.writer.write_attachment(&path, &body)?;
        self.stamp(&path, &attachment.updated_at, &attachment.created_at)?;
        tracing::info!("Attachment stored to {}", path.display());
        Ok(AttachmentOutcome::Stored)
    }

    /// mtime from `updated`, atime from `created`. Unparseable values leave
    /// that time as the filesystem set it.
    fn stamp(&self, path: &Path, updated: &str, created: &str) -> Result<()> {
        let modified = parse_remote_time(updated);
        let accessed = parse_remote_time(created);
        if modified.is_none() {
            tracing::warn!("unparseable updated-at {:?} for {}", updated, path.display());
        }
        if accessed.is_none() {
            tracing::warn!("unparseable created-at {:?} for {}", created, path.display());
        }
        self.writer.stamp_times(path, modified, accessed)
    }
}
