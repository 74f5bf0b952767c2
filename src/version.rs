//! Build version stamped into every rendered page.
//!
//! Resolved once per run. Inside a git checkout it is the short commit hash
//! of the input root; elsewhere it falls back to the current unix timestamp.
//! A fixed string can stand in for the lookup (`--build-version`).

use log::debug;
use std::path::Path;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait VersionSource: Send + Sync {
    fn version(&self, input_root: &Path) -> String;
}

/// `git rev-parse --short HEAD` run in the input root, or a timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitVersion;

impl VersionSource for GitVersion {
    fn version(&self, input_root: &Path) -> String {
        let hash = Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .current_dir(input_root)
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
            .filter(|h| !h.is_empty());

        match hash {
            Some(hash) => hash,
            None => {
                debug!(
                    "no git revision for {}, using timestamp",
                    input_root.display()
                );
                timestamp()
            }
        }
    }
}

impl VersionSource for String {
    fn version(&self, _input_root: &Path) -> String {
        self.clone()
    }
}

/// Seconds since the unix epoch, as a string.
pub fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}
