//! Run options and their validation.
//!
//! The CLI hands over whatever it parsed as [`RawOptions`]; [`SyncOptions::validate`]
//! either yields a complete option set or every missing field at once, before
//! anything network-facing is built.

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Options as parsed, before required-field checks.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub dry_run: bool,
    pub output_path: Option<PathBuf>,
    pub account_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validated options for one sync run.
#[derive(Clone)]
pub struct SyncOptions {
    pub dry_run: bool,
    pub output_path: PathBuf,
    pub account_id: String,
    pub username: String,
    pub password: String,
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("dry_run", &self.dry_run)
            .field("output_path", &self.output_path)
            .field("account_id", &self.account_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SyncOptions {
    /// Checks required fields in flag order: account id, username, password,
    /// output path. Blank values count as missing; present values are kept
    /// verbatim.
    pub fn validate(raw: RawOptions) -> Result<SyncOptions, Vec<ConfigError>> {
        let mut missing = Vec::new();

        let account_id = required(raw.account_id, "--account-id", &mut missing);
        let username = required(raw.username, "--username", &mut missing);
        let password = required(raw.password, "--password", &mut missing);
        let output_path = raw
            .output_path
            .filter(|p| !p.as_os_str().is_empty());
        if output_path.is_none() {
            missing.push(ConfigError::MissingArgument("--output-path"));
        }

        match (account_id, username, password, output_path) {
            (Some(account_id), Some(username), Some(password), Some(output_path))
                if missing.is_empty() =>
            {
                Ok(SyncOptions {
                    dry_run: raw.dry_run,
                    output_path,
                    account_id,
                    username,
                    password,
                })
            }
            _ => Err(missing),
        }
    }
}

fn required(
    value: Option<String>,
    flag: &'static str,
    missing: &mut Vec<ConfigError>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            missing.push(ConfigError::MissingArgument(flag));
            None
        }
    }
}
