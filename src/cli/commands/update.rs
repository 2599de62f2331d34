//! Update command - update the managed yt-dlp copy.

use crate::cli::Output;
use crate::config::Settings;
use crate::convert::ConvertService;
use anyhow::Result;

/// Update the managed yt-dlp binary through its self-update mechanism.
pub async fn run_update(settings: Settings) -> Result<()> {
    let service = ConvertService::new(settings);

    let spinner = Output::spinner("Updating yt-dlp...");
    let ran = service.update_ytdlp().await?;
    spinner.finish_and_clear();

    if ran {
        Output::success("yt-dlp is up to date.");
    } else {
        Output::info("No managed yt-dlp copy to update.");
        Output::info("System installs are updated by your package manager; `hent setup` creates a managed copy.");
    }

    Ok(())
}
