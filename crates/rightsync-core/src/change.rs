//! Attachment change detection.
//!
//! The only incremental-sync mechanism: a local copy is kept when its MD5
//! matches the digest the dashboard reports. Size and timestamps are never
//! consulted.

use anyhow::Result;
use std::path::Path;

use crate::checksum;
use crate::model::Attachment;

/// Returns `true` when `attachment` must be (re-)downloaded to `local_path`.
///
/// Fails only when a local file exists but cannot be read.
pub fn should_download(attachment: &Attachment, local_path: &Path) -> Result<bool> {
    if !local_path.is_file() {
        return Ok(true);
    }
    let local = checksum::md5_path(local_path)?;
    let remote = attachment.content_hash.trim();
    if local.eq_ignore_ascii_case(remote) {
        tracing::info!(
            "already downloaded {} with {} md5",
            local_path.display(),
            remote
        );
        return Ok(false);
    }
    tracing::debug!(
        path = %local_path.display(),
        local = %local,
        remote = %remote,
        "local copy differs"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(hash: &str) -> Attachment {
        Attachment {
            filename: "data.csv".to_string(),
            uri: "/download".to_string(),
            size: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            content_hash: hash.to_string(),
        }
    }

    #[test]
    fn missing_local_file_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        assert!(should_download(&attachment("abc123"), &path).unwrap());
    }

    #[test]
    fn matching_hash_skips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, b"hello\n").unwrap();
        let att = attachment("b1946ac92492d2347c6235b4d2611184");
        assert!(!should_download(&att, &path).unwrap());
    }

    #[test]
    fn hash_comparison_ignores_case_and_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, b"hello\n").unwrap();
        let att = attachment(" B1946AC92492D2347C6235B4D2611184 ");
        assert!(!should_download(&att, &path).unwrap());
    }

    #[test]
    fn mismatched_hash_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, b"stale contents").unwrap();
        assert!(should_download(&attachment("abc123"), &path).unwrap());
    }

    #[test]
    fn empty_remote_hash_always_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, b"").unwrap();
        assert!(should_download(&attachment(""), &path).unwrap());
    }
}
