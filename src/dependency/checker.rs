//! Dependency availability checks.

use super::Tool;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Checks whether an external tool is usable, either from the system path
/// or from the managed download folder.
pub struct DependencyChecker {
    tool: Tool,
    managed_dir: PathBuf,
}

impl DependencyChecker {
    pub fn new(tool: Tool, managed_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            managed_dir: managed_dir.into(),
        }
    }

    /// The tool this checker is responsible for.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// The folder where downloaded copies of the tool are kept.
    pub fn managed_dir(&self) -> &Path {
        &self.managed_dir
    }

    /// Whether the tool is available at all (system path or managed copy).
    ///
    /// Absence is a normal, reportable condition; this never errors.
    pub async fn is_available(&self) -> bool {
        self.is_in_system_path().await || self.downloaded_path().is_some()
    }

    /// Whether the tool resolves on the system `PATH` and runs.
    pub async fn is_in_system_path(&self) -> bool {
        let Ok(resolved) = which::which(self.tool.binary_name()) else {
            return false;
        };

        debug!("{} resolved to {:?}", self.tool, resolved);
        self.probe(&resolved).await
    }

    /// Path of the downloaded copy in the managed folder, if one exists.
    pub fn downloaded_path(&self) -> Option<PathBuf> {
        let candidate = self.managed_dir.join(self.tool.binary_name());
        candidate.is_file().then_some(candidate)
    }

    /// Run the tool's version command to confirm it actually works.
    async fn probe(&self, path: &Path) -> bool {
        match Command::new(path).arg(self.tool.version_arg()).output().await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downloaded_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let checker = DependencyChecker::new(Tool::Ffmpeg, dir.path());
        assert!(checker.downloaded_path().is_none());
    }

    #[test]
    fn test_downloaded_path_present() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join(Tool::YtDlp.binary_name());
        std::fs::write(&binary, b"#!/bin/sh\n").unwrap();

        let checker = DependencyChecker::new(Tool::YtDlp, dir.path());
        assert_eq!(checker.downloaded_path(), Some(binary));
    }

    #[tokio::test]
    async fn test_available_with_managed_copy_only() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join(Tool::Ffmpeg.binary_name());
        std::fs::write(&binary, b"").unwrap();

        let checker = DependencyChecker::new(Tool::Ffmpeg, dir.path());
        // The managed copy counts even if nothing is on the system path.
        assert!(checker.downloaded_path().is_some());
        assert!(checker.is_available().await);
    }
}
