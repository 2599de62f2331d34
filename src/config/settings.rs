//! Configuration settings for Hent.

use crate::convert::{AudioBitrate, AudioFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub conversion: ConversionSettings,
    pub dependencies: DependencySettings,
    pub updates: UpdateSettings,
    pub ui: UiSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Directory where converted audio files are written.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.hent".to_string(),
            output_dir: "~/Music/hent".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Conversion output settings.
///
/// These mirror the user's selection in the persisted store; changing them
/// through [`Settings::set_audio_format`] / [`Settings::set_audio_bitrate`]
/// updates both the in-memory value and the file on disk together.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConversionSettings {
    /// Target audio format.
    pub audio_format: AudioFormat,
    /// Target audio bitrate.
    pub audio_bitrate: AudioBitrate,
}

/// Settings for managed dependency binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencySettings {
    /// Folder where downloaded dependency binaries are kept.
    pub folder: String,
    /// Override URL for the yt-dlp binary download.
    pub ytdlp_url: Option<String>,
    /// Override URL for the ffmpeg binary download.
    pub ffmpeg_url: Option<String>,
}

impl Default for DependencySettings {
    fn default() -> Self {
        Self {
            folder: "~/.hent/bin".to_string(),
            ytdlp_url: None,
            ffmpeg_url: None,
        }
    }
}

/// Application update settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSettings {
    /// Whether to check for application updates on startup.
    pub check_for_updates: bool,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            check_for_updates: true,
        }
    }
}

/// Front-end presentation settings.
///
/// Hent renders no windows itself, but graphical front-ends read and write
/// these through the same settings store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UiSettings {
    /// Use the system title bar instead of a custom one.
    pub use_system_title_bar: bool,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::HentError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set the audio format and persist the change.
    pub fn set_audio_format(&mut self, format: AudioFormat) -> crate::error::Result<()> {
        self.conversion.audio_format = format;
        self.save()
    }

    /// Set the audio bitrate and persist the change.
    pub fn set_audio_bitrate(&mut self, bitrate: AudioBitrate) -> crate::error::Result<()> {
        self.conversion.audio_bitrate = bitrate;
        self.save()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hent")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Get the expanded managed dependency folder path.
    pub fn dependency_dir(&self) -> PathBuf {
        Self::expand_path(&self.dependencies.folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.general.log_level, "info");
        assert_eq!(settings.conversion.audio_format, AudioFormat::Mp3);
        assert!(settings.updates.check_for_updates);
        assert!(!settings.ui.use_system_title_bar);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = PathBuf::from("/nonexistent/hent-config.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.dependencies.folder, "~/.hent/bin");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.conversion.audio_format = AudioFormat::Ogg;
        settings.conversion.audio_bitrate = AudioBitrate::Kbps256;
        settings.save_to(&path).unwrap();

        let reloaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(reloaded.conversion.audio_format, AudioFormat::Ogg);
        assert_eq!(reloaded.conversion.audio_bitrate, AudioBitrate::Kbps256);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[conversion]\naudio_format = \"m4a\"\n").unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.conversion.audio_format, AudioFormat::M4a);
        assert_eq!(settings.general.log_level, "info");
    }

    #[test]
    fn test_expand_path() {
        let expanded = Settings::expand_path("~/music");
        assert!(!expanded.to_string_lossy().contains('~'));
    }
}
