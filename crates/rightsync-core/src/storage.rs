//! Disk writes for stored resources.
//!
//! Every file is written to a `.part` sibling and atomically renamed into
//! place, so an interrupted run never leaves a truncated final file. In
//! dry-run mode each operation logs what it would do and then returns without
//! touching the filesystem (not even to create directories).

use anyhow::{Context, Result};
use std::fs::{self, File, FileTimes};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::model::Resource;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `data.csv` → `data.csv.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

#[derive(Debug, Clone, Copy)]
pub struct StorageWriter {
    dry_run: bool,
}

impl StorageWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Create all missing ancestors of `path`. No-op if they exist.
    pub fn ensure_parent_dir(&self, path: &Path) -> Result<()> {
        let Some(dir) = path.parent() else {
            return Ok(());
        };
        if dir.as_os_str().is_empty() || dir.is_dir() {
            return Ok(());
        }
        tracing::debug!("creating directory '{}'", dir.display());
        if self.dry_run {
            return Ok(());
        }
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))
    }

    /// Write a resource's script body.
    pub fn write_content(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        tracing::debug!(bytes = bytes.len(), "writing script to {}", path.display());
        self.write_file(path, bytes)
    }

    /// Serialize every field of `resource` as TOML.
    pub fn write_metadata(&self, path: &Path, resource: &Resource) -> Result<()> {
        tracing::debug!("writing metadata to {}", path.display());
        if self.dry_run {
            return Ok(());
        }
        let toml = toml::to_string_pretty(resource).context("serialize metadata")?;
        self.write_file(path, toml.as_bytes())
    }

    /// Write a downloaded attachment body.
    pub fn write_attachment(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        tracing::debug!(bytes = bytes.len(), "writing attachment to {}", path.display());
        self.write_file(path, bytes)
    }

    /// Set modification and access times of `path`. A `None` leaves that
    /// time untouched; both `None` is a no-op.
    pub fn stamp_times(
        &self,
        path: &Path,
        modified: Option<SystemTime>,
        accessed: Option<SystemTime>,
    ) -> Result<()> {
        if self.dry_run || (modified.is_none() && accessed.is_none()) {
            return Ok(());
        }
        let mut times = FileTimes::new();
        if let Some(m) = modified {
            times = times.set_modified(m);
        }
        if let Some(a) = accessed {
            times = times.set_accessed(a);
        }
        let file = File::options()
            .write(true)
            .open(path)
            .with_context(|| format!("open {} to set times", path.display()))?;
        file.set_times(times)
            .with_context(|| format!("set times on {}", path.display()))?;
        Ok(())
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        self.ensure_parent_dir(path)?;

        let tmp = temp_path(path);
        {
            let mut f = File::create(&tmp)
                .with_context(|| format!("failed to create temp file: {}", tmp.display()))?;
            f.write_all(bytes)
                .with_context(|| format!("write {}", tmp.display()))?;
            f.sync_all().context("storage sync failed")?;
        }
        fs::rename(&tmp, path).with_context(|| {
            format!("failed to rename {} to {}", tmp.display(), path.display())
        })?;
        Ok(())
    }
}
