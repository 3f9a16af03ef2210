//! Records extracted from the remote catalog.

use serde::{Deserialize, Serialize};

/// One version of a RightScript as listed by the API.
///
/// Serialized as-is into `metadata.toml`, so every field here ends up on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Trailing numeric segment of `source_uri` (0 when not numeric).
    pub id: i64,
    pub name: String,
    pub version: i64,
    #[serde(rename = "script")]
    pub content: String,
    pub description: String,
    /// Remote-reported creation time, verbatim.
    pub created_at: String,
    /// Remote-reported modification time, verbatim.
    pub updated_at: String,
    pub is_head_version: bool,
    /// API reference URL of this version.
    #[serde(rename = "href")]
    pub source_uri: String,
}

/// A file attached to one [`Resource`] version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    /// Download reference; may be relative to the site base URL.
    pub uri: String,
    /// Human-readable size as shown by the dashboard (informational).
    pub size: String,
    pub created_at: String,
    pub updated_at: String,
    /// Remote MD5 digest (hex).
    pub content_hash: String,
}
