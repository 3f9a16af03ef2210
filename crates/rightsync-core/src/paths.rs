//! Storage layout: `<root>/<id>/<normalized name>/<version>/...`.
//!
//! Everything here is a pure function of the record, so re-running a sync
//! resolves every resource to the same directory.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::model::{Attachment, Resource};

pub const SCRIPT_FILE: &str = "script.txt";
pub const METADATA_FILE: &str = "metadata.toml";
pub const ATTACHMENTS_DIR: &str = "attachments";

/// Replaces every maximal run of characters outside `[A-Za-z0-9_.]` with a
/// single `_`, then lower-cases the result.
///
/// - `normalize_name("My Script!")` → `"my_script_"`
/// - `normalize_name("Install -- Apache 2.2")` → `"install_apache_2.2"`
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            out.push(c.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Path segment used for a resource name. Same as [`normalize_name`] except
/// that empty and all-dot results (`""`, `"."`, `".."`) become `"_"`.
fn name_segment(name: &str) -> String {
    let normalized = normalize_name(name);
    if normalized.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        normalized
    }
}

/// Directory holding one stored resource version.
pub fn resource_dir(output_root: &Path, resource: &Resource) -> PathBuf {
    output_root
        .join(resource.id.to_string())
        .join(name_segment(&resource.name))
        .join(resource.version.to_string())
}

pub fn script_path(resource_dir: &Path) -> PathBuf {
    resource_dir.join(SCRIPT_FILE)
}

pub fn metadata_path(resource_dir: &Path) -> PathBuf {
    resource_dir.join(METADATA_FILE)
}

pub fn attachment_dir(resource_dir: &Path) -> PathBuf {
    resource_dir.join(ATTACHMENTS_DIR)
}

/// Local path of an attachment inside `attachment_dir`.
///
/// The remote filename is used verbatim except for characters that cannot
/// appear in a single Linux path component. Names that would resolve to the
/// directory itself or its parent are rejected.
pub fn attachment_path(attachment_dir: &Path, attachment: &Attachment) -> Result<PathBuf> {
    let name = sanitize_component(&attachment.filename);
    if name.is_empty() || name == "." || name == ".." {
        bail!("unusable attachment filename {:?}", attachment.filename);
    }
    Ok(attachment_dir.join(name))
}

/// Replaces NUL, `/`, `\` and control characters with `_`.
fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: i64, name: &str, version: i64) -> Resource {
        Resource {
            id,
            name: name.to_string(),
            version,
            content: String::new(),
            description: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            is_head_version: false,
            source_uri: String::new(),
        }
    }

    fn attachment(filename: &str) -> Attachment {
        Attachment {
            filename: filename.to_string(),
            uri: String::new(),
            size: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            content_hash: String::new(),
        }
    }

    #[test]
    fn normalize_collapses_runs_and_lowercases() {
        assert_eq!(normalize_name("My Script!"), "my_script_");
        assert_eq!(normalize_name("Install -- Apache 2.2"), "install_apache_2.2");
        assert_eq!(normalize_name("SYS_tune.v2"), "sys_tune.v2");
        assert_eq!(normalize_name("café au lait"), "caf_au_lait");
    }

    #[test]
    fn normalize_keeps_existing_underscores() {
        assert_eq!(normalize_name("a__b"), "a__b");
        assert_eq!(normalize_name("a_ b"), "a__b");
    }

    #[test]
    fn normalize_is_idempotent() {
        for name in ["My Script!", "  lead and trail  ", "a/b\\c", "ÄÖÜ 123", "", "..."] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once, "input {:?}", name);
        }
    }

    #[test]
    fn resource_dir_layout() {
        let dir = resource_dir(Path::new("/out"), &resource(42, "My Script!", 3));
        assert_eq!(dir, Path::new("/out/42/my_script_/3"));
        assert_eq!(script_path(&dir), Path::new("/out/42/my_script_/3/script.txt"));
        assert_eq!(
            metadata_path(&dir),
            Path::new("/out/42/my_script_/3/metadata.toml")
        );
        assert_eq!(
            attachment_dir(&dir),
            Path::new("/out/42/my_script_/3/attachments")
        );
    }

    #[test]
    fn resource_dir_is_pure() {
        let r = resource(7, "Deploy (prod)", 12);
        assert_eq!(
            resource_dir(Path::new("out"), &r),
            resource_dir(Path::new("out"), &r.clone())
        );
    }

    #[test]
    fn dot_only_names_stay_inside_id_dir() {
        assert_eq!(
            resource_dir(Path::new("/out"), &resource(1, "..", 1)),
            Path::new("/out/1/_/1")
        );
        assert_eq!(
            resource_dir(Path::new("/out"), &resource(1, "", 1)),
            Path::new("/out/1/_/1")
        );
    }

    #[test]
    fn attachment_path_keeps_plain_names() {
        let p = attachment_path(Path::new("/a"), &attachment("data.csv")).unwrap();
        assert_eq!(p, Path::new("/a/data.csv"));
        let hidden = attachment_path(Path::new("/a"), &attachment(".bashrc")).unwrap();
        assert_eq!(hidden, Path::new("/a/.bashrc"));
    }

    #[test]
    fn attachment_path_replaces_separators() {
        let p = attachment_path(Path::new("/a"), &attachment("../etc/passwd")).unwrap();
        assert_eq!(p, Path::new("/a/.._etc_passwd"));
    }

    #[test]
    fn attachment_path_rejects_parent_reference() {
        assert!(attachment_path(Path::new("/a"), &attachment("..")).is_err());
        assert!(attachment_path(Path::new("/a"), &attachment(".")).is_err());
    }
}
