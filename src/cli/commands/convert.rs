//! Convert command - one-shot conversion of a single URL.

use crate::cli::Output;
use crate::config::Settings;
use crate::convert::{ConvertEvent, ConvertService};
use anyhow::Result;
use std::sync::Arc;

/// Run a single conversion and mirror its progress to the terminal.
pub async fn run_convert(url: &str, settings: Settings) -> Result<()> {
    let service = Arc::new(ConvertService::new(settings));

    if !service.is_video_url_convertible(url) {
        Output::error(&format!("Not a recognized video link: {}", url));
        anyhow::bail!("unsupported URL");
    }

    if !service.check_prerequisites().await {
        Output::error("ffmpeg was not found on this system.");
        Output::info("Run `hent setup` to download it, or install it yourself.");
        anyhow::bail!("ffmpeg not found");
    }

    if !service.is_ytdlp_available().await {
        Output::info("yt-dlp is missing, downloading it first...");
        service.download_ytdlp().await?;
    }

    let mut events = service.subscribe();
    let bar = Output::percent_bar("converting");

    let convert_service = service.clone();
    let convert_url = url.to_string();
    let job = tokio::spawn(async move { convert_service.convert(&convert_url).await });

    while let Ok(event) = events.recv().await {
        match event {
            ConvertEvent::Started { .. } => bar.set_position(0),
            ConvertEvent::Progress(percent) => bar.set_position(percent as u64),
            ConvertEvent::Completed(_) => break,
        }
    }
    bar.finish_and_clear();

    let result = job.await??;

    if result.success {
        match service.last_converted() {
            Some(last) => Output::success(&format!("Saved {}", last.path.display())),
            None => Output::success("Conversion finished."),
        }
        Ok(())
    } else {
        Output::error(&format!(
            "Conversion failed: {}",
            result.error.unwrap_or_else(|| "unknown error".to_string())
        ));
        anyhow::bail!("conversion failed");
    }
}
