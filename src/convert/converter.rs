//! Converter strategies.
//!
//! A converter takes a video URL and produces an audio file by driving
//! external tools. The only strategy shipped today wraps yt-dlp (which in
//! turn drives ffmpeg for transcoding), but strategy selection stays behind
//! a trait so other downloaders can slot in per URL.

use super::format::{AudioBitrate, AudioFormat};
use crate::error::{HentError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// One conversion job.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// Video URL to fetch.
    pub url: String,
    /// Directory the audio file is written to.
    pub output_dir: PathBuf,
    /// Target audio format.
    pub format: AudioFormat,
    /// Target audio bitrate.
    pub bitrate: AudioBitrate,
    /// Path override for ffmpeg; `None` when it resolves on the system path.
    pub ffmpeg_path: Option<PathBuf>,
    /// Path override for yt-dlp; `None` when it resolves on the system path.
    pub ytdlp_path: Option<PathBuf>,
}

/// Outcome of one conversion attempt.
///
/// Failure is part of the value, not an error: callers always get a result
/// back and read the `success` flag.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub success: bool,
    /// Path of the converted file when successful.
    pub output_path: Option<PathBuf>,
    /// Tool error output when failed.
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn succeeded(output_path: PathBuf) -> Self {
        Self {
            success: true,
            output_path: Some(output_path),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output_path: None,
            error: Some(error.into()),
        }
    }
}

/// A strategy that can convert certain video URLs to audio.
#[async_trait]
pub trait VideoConverter: Send + Sync {
    /// Whether this converter handles the given URL.
    fn can_handle(&self, url: &str) -> bool;

    /// Run the conversion, reporting download percentages through
    /// `on_progress` as the tool emits them.
    async fn convert(
        &self,
        request: &ConvertRequest,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<ConversionResult>;
}

/// Converter backed by the yt-dlp command-line tool.
pub struct YtdlpConverter {
    progress_regex: Regex,
    destination_regex: Regex,
}

impl YtdlpConverter {
    pub fn new() -> Self {
        // yt-dlp with --newline prints lines like:
        //   [download]  45.3% of 3.52MiB at 1.21MiB/s ETA 00:02
        //   [ExtractAudio] Destination: /path/to/file.mp3
        let progress_regex =
            Regex::new(r"^\[download\]\s+(\d+(?:\.\d+)?)%").expect("Invalid regex");
        let destination_regex = Regex::new(r"Destination:\s+(.+)$").expect("Invalid regex");

        Self {
            progress_regex,
            destination_regex,
        }
    }

    fn parse_progress(&self, line: &str) -> Option<f32> {
        self.progress_regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f32>().ok())
    }

    fn parse_destination(&self, line: &str) -> Option<PathBuf> {
        self.destination_regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| PathBuf::from(m.as_str().trim()))
    }

    /// Resolve the final audio file from the destinations yt-dlp reported.
    ///
    /// The post-processing destination wins when present; otherwise the
    /// download destination with the target extension is probed (yt-dlp
    /// skips transcoding when the source is already in the target format).
    fn resolve_output(
        &self,
        last_destination: Option<PathBuf>,
        format: AudioFormat,
    ) -> Option<PathBuf> {
        let destination = last_destination?;
        if destination.exists() {
            return Some(destination);
        }

        let converted = destination.with_extension(format.file_extension());
        converted.exists().then_some(converted)
    }
}

impl Default for YtdlpConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoConverter for YtdlpConverter {
    fn can_handle(&self, url: &str) -> bool {
        super::is_video_url_convertible(url)
    }

    async fn convert(
        &self,
        request: &ConvertRequest,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<ConversionResult> {
        let binary: PathBuf = request
            .ytdlp_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("yt-dlp"));

        let template = request.output_dir.join("%(title)s.%(ext)s");

        let mut command = Command::new(&binary);
        command
            .arg("--newline")
            .arg("--progress")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("--extract-audio")
            .arg("--audio-format").arg(request.format.extension())
            .arg("--audio-quality").arg(format!("{}K", request.bitrate.kbps()))
            .arg("--output").arg(template.as_os_str());

        if let Some(ffmpeg) = &request.ffmpeg_path {
            command.arg("--ffmpeg-location").arg(ffmpeg.as_os_str());
        }

        command
            .arg(&request.url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null());

        info!("Converting {} to {}", request.url, request.format);
        debug!("Spawning {:?}", binary);

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HentError::ToolNotFound("yt-dlp".to_string())
            } else {
                HentError::Conversion(format!("Failed to spawn yt-dlp: {}", e))
            }
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HentError::Conversion("yt-dlp stdout not captured".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| HentError::Conversion("yt-dlp stderr not captured".into()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut last_destination: Option<PathBuf> = None;

        while let Some(line) = lines.next_line().await? {
            if let Some(percent) = self.parse_progress(&line) {
                on_progress(percent);
            } else if let Some(dest) = self.parse_destination(&line) {
                debug!("Destination: {:?}", dest);
                last_destination = Some(dest);
            }
        }

        let status = child.wait().await?;
        let stderr_output = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let tail = error_tail(&stderr_output);
            warn!("yt-dlp exited with {}: {}", status, tail);
            return Ok(ConversionResult::failed(tail));
        }

        match self.resolve_output(last_destination, request.format) {
            Some(path) => {
                info!("Converted to {:?}", path);
                Ok(ConversionResult::succeeded(path))
            }
            None => Ok(ConversionResult::failed(
                "yt-dlp succeeded but no output file was found",
            )),
        }
    }
}

/// Last few lines of tool output, for compact error reporting.
fn error_tail(output: &str) -> String {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let tail_start = lines.len().saturating_sub(3);
    let tail = lines[tail_start..].join(" | ");

    if tail.is_empty() {
        "yt-dlp failed without error output".to_string()
    } else {
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_lines() {
        let converter = YtdlpConverter::new();

        assert_eq!(
            converter.parse_progress("[download]  45.3% of 3.52MiB at 1.21MiB/s ETA 00:02"),
            Some(45.3)
        );
        assert_eq!(converter.parse_progress("[download] 100% of 3.52MiB"), Some(100.0));
        assert_eq!(converter.parse_progress("[ExtractAudio] Destination: x.mp3"), None);
        assert_eq!(converter.parse_progress("[download] Destination: x.webm"), None);
    }

    #[test]
    fn test_parse_destination_lines() {
        let converter = YtdlpConverter::new();

        assert_eq!(
            converter.parse_destination("[ExtractAudio] Destination: /tmp/song.mp3"),
            Some(PathBuf::from("/tmp/song.mp3"))
        );
        assert_eq!(
            converter.parse_destination("[download] Destination: /tmp/song.webm"),
            Some(PathBuf::from("/tmp/song.webm"))
        );
        assert_eq!(converter.parse_destination("[download]  45.3%"), None);
    }

    #[test]
    fn test_resolve_output_prefers_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let converter = YtdlpConverter::new();

        let mp3 = dir.path().join("song.mp3");
        std::fs::write(&mp3, b"").unwrap();

        let resolved = converter.resolve_output(Some(mp3.clone()), AudioFormat::Mp3);
        assert_eq!(resolved, Some(mp3));
    }

    #[test]
    fn test_resolve_output_swaps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let converter = YtdlpConverter::new();

        // Download destination was the source container; the transcoded file
        // sits next to it with the target extension.
        let webm = dir.path().join("song.webm");
        let mp3 = dir.path().join("song.mp3");
        std::fs::write(&mp3, b"").unwrap();

        let resolved = converter.resolve_output(Some(webm), AudioFormat::Mp3);
        assert_eq!(resolved, Some(mp3));
    }

    #[test]
    fn test_can_handle_known_hosts_only() {
        let converter = YtdlpConverter::new();
        assert!(converter.can_handle("https://youtu.be/abc"));
        assert!(!converter.can_handle("https://vimeo.com/12345"));
    }

    #[test]
    fn test_error_tail_keeps_last_lines() {
        let output = "line one\nline two\nline three\nline four\n";
        let tail = error_tail(output);
        assert!(tail.contains("line four"));
        assert!(!tail.contains("line one"));
    }

    #[test]
    fn test_error_tail_empty_output() {
        assert_eq!(error_tail(""), "yt-dlp failed without error output");
    }
}
