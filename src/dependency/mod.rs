//! External binary dependency management.
//!
//! Hent shells out to two external tools: yt-dlp for downloading and ffmpeg
//! for transcoding. This module checks whether they are present (on the
//! system path or in the managed download folder), downloads missing
//! binaries, and updates the managed yt-dlp copy.

mod checker;
mod downloader;

pub use checker::DependencyChecker;
pub use downloader::DependencyDownloader;

/// An external tool required for conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffmpeg,
    YtDlp,
}

impl Tool {
    /// Name of the binary on the current platform.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::Ffmpeg => {
                if cfg!(target_os = "windows") {
                    "ffmpeg.exe"
                } else {
                    "ffmpeg"
                }
            }
            Tool::YtDlp => {
                if cfg!(target_os = "windows") {
                    "yt-dlp.exe"
                } else {
                    "yt-dlp"
                }
            }
        }
    }

    /// Version flag accepted by the tool.
    ///
    /// ffmpeg uses `-version` (single dash), yt-dlp uses `--version`.
    pub fn version_arg(&self) -> &'static str {
        match self {
            Tool::Ffmpeg => "-version",
            Tool::YtDlp => "--version",
        }
    }

    /// Default download URL for a standalone binary of this tool.
    pub fn default_download_url(&self) -> &'static str {
        match self {
            Tool::YtDlp => {
                if cfg!(target_os = "windows") {
                    "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp.exe"
                } else if cfg!(target_os = "macos") {
                    "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp_macos"
                } else {
                    "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp"
                }
            }
            Tool::Ffmpeg => {
                if cfg!(target_os = "windows") {
                    "https://github.com/eugeneware/ffmpeg-static/releases/latest/download/ffmpeg-win32-x64"
                } else if cfg!(target_os = "macos") {
                    "https://github.com/eugeneware/ffmpeg-static/releases/latest/download/ffmpeg-darwin-x64"
                } else {
                    "https://github.com/eugeneware/ffmpeg-static/releases/latest/download/ffmpeg-linux-x64"
                }
            }
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tool::Ffmpeg => write!(f, "ffmpeg"),
            Tool::YtDlp => write!(f, "yt-dlp"),
        }
    }
}
