//! Per-run counters and failure records.

use std::fmt;

/// Where a resource was in its pipeline when something failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStep {
    Fetching,
    StoringScript,
    StoringMetadata,
    StoringAttachments,
}

impl fmt::Display for ResourceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceStep::Fetching => "fetching attachments",
            ResourceStep::StoringScript => "storing script",
            ResourceStep::StoringMetadata => "storing metadata",
            ResourceStep::StoringAttachments => "storing attachments",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub resource_id: i64,
    pub version: i64,
    pub step: ResourceStep,
    /// Attachment filename when the failure was attachment-scoped.
    pub attachment: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub resources_listed: usize,
    pub resources_synced: usize,
    pub resources_failed: usize,
    pub attachments_downloaded: usize,
    pub attachments_skipped: usize,
    pub attachments_failed: usize,
    pub failures: Vec<Failure>,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} resources synced ({} failed); \
             attachments: {} downloaded, {} up to date, {} failed",
            self.resources_synced,
            self.resources_listed,
            self.resources_failed,
            self.attachments_downloaded,
            self.attachments_skipped,
            self.attachments_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line() {
        let r = SyncReport {
            resources_listed: 3,
            resources_synced: 2,
            resources_failed: 1,
            attachments_downloaded: 4,
            attachments_skipped: 5,
            attachments_failed: 0,
            failures: Vec::new(),
        };
        assert_eq!(
            r.to_string(),
            "2 of 3 resources synced (1 failed); attachments: 4 downloaded, 5 up to date, 0 failed"
        );
        assert!(!r.has_failures());
    }
}
