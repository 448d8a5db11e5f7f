use std::path::{Path, PathBuf};
use std::process::Command;

use sha1::{Digest, Sha1};
use tracing::{info, warn};

use crate::page::config::SnapshotConfig;

/// Writes response bodies to disk so a failing page can be inspected.
///
/// Best effort throughout: a missing directory or a failing opener is logged
/// and otherwise ignored, since the snapshot only accompanies another failure.
#[derive(Debug, Clone, Default)]
pub struct Snapshotter {
    dir: Option<PathBuf>,
    open_command: Option<String>,
}

impl Snapshotter {
    pub fn new(dir: Option<PathBuf>, open_command: Option<String>) -> Self {
        Self { dir, open_command }
    }

    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(config.dir.as_ref().map(PathBuf::from), config.open_command.clone())
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Write `body` and open it if an opener is configured.
    pub fn save_and_open(&self, body: &str) -> Option<PathBuf> {
        let path = self.save(body)?;
        if let Some(cmd) = &self.open_command {
            if let Err(e) = Command::new(cmd).arg(&path).spawn() {
                warn!("failed to open snapshot with '{}': {}", cmd, e);
            }
        }
        Some(path)
    }

    pub fn save(&self, body: &str) -> Option<PathBuf> {
        let dir = self.dir.as_deref()?;
        if !dir.is_dir() {
            return None;
        }

        let path = dir.join(snapshot_file_name(body));
        match std::fs::write(&path, body) {
            Ok(()) => {
                info!("saved page snapshot to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("could not write snapshot {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

/// Content-addressed name, so dumping the same page twice reuses one file.
pub fn snapshot_file_name(body: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(body.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("clickthrough-{}.html", &digest[..12])
}
