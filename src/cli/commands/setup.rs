//! Setup command - download missing dependency binaries.

use crate::cli::Output;
use crate::config::Settings;
use crate::convert::ConvertService;
use anyhow::Result;

/// Download ffmpeg and yt-dlp into the managed folder when missing.
pub async fn run_setup(settings: Settings) -> Result<()> {
    let dep_dir = settings.dependency_dir();
    let service = ConvertService::new(settings);

    Output::info(&format!("Managed dependency folder: {}", dep_dir.display()));

    if service.is_ffmpeg_available().await {
        Output::success("ffmpeg is already available.");
    } else {
        let spinner = Output::spinner("Downloading ffmpeg...");
        service.download_ffmpeg().await?;
        spinner.finish_and_clear();
        Output::success("ffmpeg downloaded.");
    }

    if service.is_ytdlp_available().await {
        Output::success("yt-dlp is already available.");
    } else {
        let spinner = Output::spinner("Downloading yt-dlp...");
        service.download_ytdlp().await?;
        spinner.finish_and_clear();
        Output::success("yt-dlp downloaded.");
    }

    Output::success("Setup complete. Run `hent watch` to start converting.");
    Ok(())
}
