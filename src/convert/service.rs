//! The convert service.
//!
//! Owns the conversion configuration, exposes dependency check/download
//! operations, and drives converter strategies. Everything observable about
//! a running conversion (start, progress, completion) is published on a
//! broadcast channel that the state machine and front-ends subscribe to.

use super::converter::{ConversionResult, ConvertRequest, VideoConverter, YtdlpConverter};
use super::format::{AudioBitrate, AudioFormat};
use crate::config::Settings;
use crate::dependency::{DependencyChecker, DependencyDownloader, Tool};
use crate::error::{HentError, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Events published while a conversion runs.
#[derive(Debug, Clone)]
pub enum ConvertEvent {
    /// A conversion was started for the given URL.
    Started { url: String },
    /// Download percentage reported by the converter, mirrored raw.
    Progress(f32),
    /// The conversion finished, successfully or not.
    Completed(ConversionResult),
}

/// Reference to the most recently converted file, kept for
/// "open" / "show in folder" style actions.
#[derive(Debug, Clone)]
pub struct LastConverted {
    pub path: PathBuf,
    pub file_name: String,
}

/// Service that owns conversion configuration and delegates conversion work.
pub struct ConvertService {
    settings: Settings,
    ffmpeg: DependencyChecker,
    ytdlp: DependencyChecker,
    downloader: DependencyDownloader,
    converters: Vec<Arc<dyn VideoConverter>>,
    events: broadcast::Sender<ConvertEvent>,
    last_converted: Mutex<Option<LastConverted>>,
}

impl ConvertService {
    /// Create a service with the default converter strategies.
    pub fn new(settings: Settings) -> Self {
        let converters: Vec<Arc<dyn VideoConverter>> = vec![Arc::new(YtdlpConverter::new())];
        Self::with_converters(settings, converters)
    }

    /// Create a service with custom converter strategies.
    pub fn with_converters(settings: Settings, converters: Vec<Arc<dyn VideoConverter>>) -> Self {
        let dependency_dir = settings.dependency_dir();
        let (events, _) = broadcast::channel(64);

        Self {
            ffmpeg: DependencyChecker::new(Tool::Ffmpeg, &dependency_dir),
            ytdlp: DependencyChecker::new(Tool::YtDlp, &dependency_dir),
            downloader: DependencyDownloader::new(&dependency_dir),
            settings,
            converters,
            events,
            last_converted: Mutex::new(None),
        }
    }

    /// Subscribe to conversion events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConvertEvent> {
        self.events.subscribe()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Currently selected audio format.
    pub fn audio_format(&self) -> AudioFormat {
        self.settings.conversion.audio_format
    }

    /// Currently selected audio bitrate.
    pub fn audio_bitrate(&self) -> AudioBitrate {
        self.settings.conversion.audio_bitrate
    }

    /// Select an audio format, updating the persisted settings store.
    pub fn set_audio_format(&mut self, format: AudioFormat) -> Result<()> {
        self.settings.set_audio_format(format)
    }

    /// Select an audio bitrate, updating the persisted settings store.
    pub fn set_audio_bitrate(&mut self, bitrate: AudioBitrate) -> Result<()> {
        self.settings.set_audio_bitrate(bitrate)
    }

    /// The most recently converted file, if any.
    pub fn last_converted(&self) -> Option<LastConverted> {
        self.last_converted.lock().unwrap().clone()
    }

    /// Whether clipboard text looks like a convertible video link.
    pub fn is_video_url_convertible(&self, text: &str) -> bool {
        super::is_video_url_convertible(text)
    }

    /// Whether ffmpeg is available (system path or managed copy).
    pub async fn is_ffmpeg_available(&self) -> bool {
        self.ffmpeg.is_available().await
    }

    /// Whether yt-dlp is available (system path or managed copy).
    pub async fn is_ytdlp_available(&self) -> bool {
        self.ytdlp.is_available().await
    }

    /// Startup verification that conversion can work at all.
    ///
    /// The transcoder is the hard requirement; yt-dlp can still be fetched
    /// through `download_ytdlp` afterwards.
    pub async fn check_prerequisites(&self) -> bool {
        self.is_ffmpeg_available().await
    }

    /// Download ffmpeg into the managed folder unless it is already available.
    pub async fn download_ffmpeg(&self) -> Result<()> {
        self.download_tool(&self.ffmpeg, self.settings.dependencies.ffmpeg_url.as_deref())
            .await
    }

    /// Download yt-dlp into the managed folder unless it is already available.
    pub async fn download_ytdlp(&self) -> Result<()> {
        self.download_tool(&self.ytdlp, self.settings.dependencies.ytdlp_url.as_deref())
            .await
    }

    async fn download_tool(&self, checker: &DependencyChecker, url: Option<&str>) -> Result<()> {
        if checker.is_available().await {
            debug!("{} already available, skipping download", checker.tool());
            return Ok(());
        }

        info!("Starting {} download", checker.tool());
        self.downloader.download(checker.tool(), url).await?;
        info!("Finished {} download", checker.tool());
        Ok(())
    }

    /// Update the managed yt-dlp copy.
    ///
    /// Only applies when a downloaded copy exists; a system-installed yt-dlp
    /// belongs to the package manager. Returns whether an update ran.
    pub async fn update_ytdlp(&self) -> Result<bool> {
        match self.ytdlp.downloaded_path() {
            Some(path) => {
                self.downloader.update_ytdlp(&path).await?;
                Ok(true)
            }
            None => {
                debug!("No managed yt-dlp copy, nothing to update");
                Ok(false)
            }
        }
    }

    /// Convert a video URL to audio with the current format/bitrate.
    ///
    /// Always returns a [`ConversionResult`]; conversion failures are carried
    /// in the result's `success` flag, never as an error. Errors from the
    /// converter boundary (tool missing, spawn failures) are translated into
    /// failed results here.
    pub async fn convert(&self, video_url: &str) -> Result<ConversionResult> {
        let output_dir = self.settings.output_dir();
        tokio::fs::create_dir_all(&output_dir).await?;

        let request = ConvertRequest {
            url: video_url.to_string(),
            output_dir,
            format: self.audio_format(),
            bitrate: self.audio_bitrate(),
            ffmpeg_path: self.resolve_override(&self.ffmpeg).await,
            ytdlp_path: self.resolve_override(&self.ytdlp).await,
        };

        let converter = self
            .converters
            .iter()
            .find(|c| c.can_handle(video_url))
            .ok_or_else(|| {
                HentError::InvalidInput(format!("No converter handles URL: {}", video_url))
            })?;

        let _ = self.events.send(ConvertEvent::Started {
            url: video_url.to_string(),
        });

        let progress_events = self.events.clone();
        let on_progress = move |percent: f32| {
            let _ = progress_events.send(ConvertEvent::Progress(percent));
        };

        let result = match converter.convert(&request, &on_progress).await {
            Ok(result) => result,
            Err(e) => {
                error!("Conversion failed at the tool boundary: {}", e);
                ConversionResult::failed(e.to_string())
            }
        };

        if let Some(path) = &result.output_path {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            *self.last_converted.lock().unwrap() = Some(LastConverted {
                path: path.clone(),
                file_name,
            });
        }

        let _ = self.events.send(ConvertEvent::Completed(result.clone()));
        Ok(result)
    }

    /// Path override for the converter invocation.
    ///
    /// `None` when the tool is on the system path, the managed copy's path
    /// otherwise.
    async fn resolve_override(&self, checker: &DependencyChecker) -> Option<PathBuf> {
        if checker.is_in_system_path().await {
            None
        } else {
            checker.downloaded_path()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubConverter {
        progress: Vec<f32>,
        result: ConversionResult,
    }

    #[async_trait]
    impl VideoConverter for StubConverter {
        fn can_handle(&self, url: &str) -> bool {
            url.contains("youtube.com") || url.contains("youtu.be")
        }

        async fn convert(
            &self,
            _request: &ConvertRequest,
            on_progress: &(dyn Fn(f32) + Send + Sync),
        ) -> crate::error::Result<ConversionResult> {
            for p in &self.progress {
                on_progress(*p);
            }
            Ok(self.result.clone())
        }
    }

    struct FailingConverter;

    #[async_trait]
    impl VideoConverter for FailingConverter {
        fn can_handle(&self, _url: &str) -> bool {
            true
        }

        async fn convert(
            &self,
            _request: &ConvertRequest,
            _on_progress: &(dyn Fn(f32) + Send + Sync),
        ) -> crate::error::Result<ConversionResult> {
            Err(HentError::ToolNotFound("yt-dlp".to_string()))
        }
    }

    fn test_settings() -> Settings {
        let dir = tempfile::tempdir().unwrap().into_path();
        let mut settings = Settings::default();
        settings.general.output_dir = dir.join("out").to_string_lossy().to_string();
        settings.dependencies.folder = dir.join("bin").to_string_lossy().to_string();
        settings
    }

    #[tokio::test]
    async fn test_convert_publishes_progress_and_completion() {
        let stub = StubConverter {
            progress: vec![10.0, 45.0, 100.0],
            result: ConversionResult::succeeded(PathBuf::from("/tmp/song.mp3")),
        };
        let service = ConvertService::with_converters(test_settings(), vec![Arc::new(stub)]);
        let mut events = service.subscribe();

        let result = service
            .convert("https://youtube.com/watch?v=abc")
            .await
            .unwrap();
        assert!(result.success);

        assert!(matches!(
            events.recv().await.unwrap(),
            ConvertEvent::Started { .. }
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            ConvertEvent::Progress(p) if p == 10.0
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            ConvertEvent::Progress(p) if p == 45.0
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            ConvertEvent::Progress(p) if p == 100.0
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            ConvertEvent::Completed(r) if r.success
        ));
    }

    #[tokio::test]
    async fn test_convert_records_last_converted() {
        let stub = StubConverter {
            progress: vec![],
            result: ConversionResult::succeeded(PathBuf::from("/tmp/My Song.mp3")),
        };
        let service = ConvertService::with_converters(test_settings(), vec![Arc::new(stub)]);

        assert!(service.last_converted().is_none());
        service
            .convert("https://youtu.be/abc")
            .await
            .unwrap();

        let last = service.last_converted().unwrap();
        assert_eq!(last.file_name, "My Song.mp3");
        assert_eq!(last.path, PathBuf::from("/tmp/My Song.mp3"));
    }

    #[tokio::test]
    async fn test_failed_conversion_is_a_result_not_an_error() {
        let stub = StubConverter {
            progress: vec![],
            result: ConversionResult::failed("video unavailable"),
        };
        let service = ConvertService::with_converters(test_settings(), vec![Arc::new(stub)]);
        let mut events = service.subscribe();

        let result = service
            .convert("https://youtube.com/watch?v=gone")
            .await
            .unwrap();
        assert!(!result.success);
        assert!(service.last_converted().is_none());

        assert!(matches!(
            events.recv().await.unwrap(),
            ConvertEvent::Started { .. }
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            ConvertEvent::Completed(r) if !r.success
        ));
    }

    #[tokio::test]
    async fn test_converter_boundary_errors_become_failed_results() {
        let service =
            ConvertService::with_converters(test_settings(), vec![Arc::new(FailingConverter)]);

        let result = service
            .convert("https://youtube.com/watch?v=abc")
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("yt-dlp"));
    }

    #[tokio::test]
    async fn test_unhandled_url_is_invalid_input() {
        let stub = StubConverter {
            progress: vec![],
            result: ConversionResult::failed("unused"),
        };
        let service = ConvertService::with_converters(test_settings(), vec![Arc::new(stub)]);

        let err = service.convert("https://example.com/clip").await.unwrap_err();
        assert!(matches!(err, HentError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_ytdlp_without_managed_copy_is_a_noop() {
        let service = ConvertService::new(test_settings());
        let ran = service.update_ytdlp().await.unwrap();
        assert!(!ran);
    }

    #[test]
    fn test_matcher_delegation() {
        let service = ConvertService::new(test_settings());
        assert!(service.is_video_url_convertible("https://youtu.be/x"));
        assert!(!service.is_video_url_convertible("plain text"));
    }
}
