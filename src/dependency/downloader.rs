//! Dependency binary downloads and updates.

use super::Tool;
use crate::error::{HentError, Result};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Downloads missing dependency binaries into the managed folder.
pub struct DependencyDownloader {
    client: reqwest::Client,
    target_dir: PathBuf,
}

impl DependencyDownloader {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            target_dir: target_dir.into(),
        }
    }

    /// Download a standalone binary of `tool` into the managed folder.
    ///
    /// Returns the path of the downloaded binary. An existing file at the
    /// target path is overwritten.
    pub async fn download(&self, tool: Tool, url_override: Option<&str>) -> Result<PathBuf> {
        let url = url_override.unwrap_or_else(|| tool.default_download_url());
        let target = self.target_dir.join(tool.binary_name());

        info!("Downloading {} from {}", tool, url);
        tokio::fs::create_dir_all(&self.target_dir).await?;

        let response = self.client.get(url).send().await?.error_for_status()?;

        // Stream to a temp file first so a failed download never leaves a
        // truncated binary at the final path.
        let partial = target.with_extension("partial");
        let mut file = tokio::fs::File::create(&partial).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        if written == 0 {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(HentError::DependencyDownload(format!(
                "{} download from {} was empty",
                tool, url
            )));
        }

        tokio::fs::rename(&partial, &target).await?;
        mark_executable(&target).await?;

        debug!("Wrote {} bytes to {:?}", written, target);
        info!("Downloaded {}", tool);
        Ok(target)
    }

    /// Update a managed yt-dlp copy using its self-update flag.
    ///
    /// Only meaningful for binaries in the managed folder; system installs
    /// are the package manager's responsibility.
    pub async fn update_ytdlp(&self, path: &Path) -> Result<()> {
        info!("Updating yt-dlp at {:?}", path);

        let output = Command::new(path).arg("-U").output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HentError::ToolNotFound("yt-dlp".to_string())
            } else {
                HentError::ToolFailed(format!("Failed to run yt-dlp -U: {}", e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HentError::ToolFailed(format!(
                "yt-dlp update failed: {}",
                stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        info!("yt-dlp update finished: {}", stdout.trim());
        Ok(())
    }
}

#[cfg(unix)]
async fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
