//! Watch command - the clipboard-driven conversion loop.

use crate::clipboard::{self, DEFAULT_POLL_INTERVAL};
use crate::cli::Output;
use crate::config::Settings;
use crate::convert::{ConvertEvent, ConvertService, ConvertState, ConvertStateMachine};
use anyhow::Result;
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Run the clipboard watcher and conversion state machine until Ctrl-C.
pub async fn run_watch(auto: bool, settings: Settings) -> Result<()> {
    let service = Arc::new(ConvertService::new(settings));

    let prerequisites_ok = service.check_prerequisites().await;
    let (mut machine, mut reset) = ConvertStateMachine::new(prerequisites_ok);

    if machine.state() == ConvertState::FfmpegNotFound {
        Output::error("ffmpeg was not found on this system.");
        Output::info("Run `hent setup` to download it, then start watching again.");
        return Ok(());
    }

    let mut clipboard = clipboard::spawn_watcher(DEFAULT_POLL_INTERVAL)?;
    let mut events = service.subscribe();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut bar: Option<ProgressBar> = None;

    Output::info(&format!(
        "Watching the clipboard for video links ({} {} kbit/s). Press Ctrl-C to quit.",
        service.audio_format(),
        service.audio_bitrate()
    ));
    if !auto {
        Output::info("Copy a link, then press Enter to convert it.");
    }

    loop {
        tokio::select! {
            changed = clipboard.recv() => {
                let Some(text) = changed else {
                    warn!("Clipboard watcher stopped");
                    break;
                };

                let previous = machine.state();
                machine.handle_clipboard(&text);

                if machine.state() == ConvertState::HasValidClipboardContent {
                    let url = machine.download_url().unwrap_or_default().to_string();
                    if auto {
                        trigger_conversion(&service, &url);
                    } else {
                        Output::info(&format!("Link detected: {} (Enter to convert)", url));
                    }
                } else if previous == ConvertState::HasValidClipboardContent
                    && machine.state() == ConvertState::WaitingForClipboardContent
                {
                    Output::info("Clipboard cleared, waiting for a link.");
                }
            }

            line = stdin.next_line(), if stdin_open => {
                if line?.is_none() {
                    debug!("stdin closed");
                    stdin_open = false;
                    continue;
                }
                if machine.state() == ConvertState::HasValidClipboardContent {
                    let url = machine.download_url().unwrap_or_default().to_string();
                    trigger_conversion(&service, &url);
                }
            }

            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        warn!("Dropped {} conversion events", missed);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };

                machine.handle_event(&event);

                match &event {
                    ConvertEvent::Started { url } => {
                        bar = Some(Output::percent_bar(&format!("converting {}", url)));
                    }
                    ConvertEvent::Progress(percent) => {
                        if let Some(bar) = &bar {
                            bar.set_position(*percent as u64);
                        }
                    }
                    ConvertEvent::Completed(result) => {
                        if let Some(bar) = bar.take() {
                            bar.finish_and_clear();
                        }
                        if result.success {
                            match service.last_converted() {
                                Some(last) => Output::success(&format!("Saved {}", last.path.display())),
                                None => Output::success("Conversion finished."),
                            }
                        } else {
                            Output::error(&format!(
                                "Conversion failed: {}",
                                result.error.clone().unwrap_or_else(|| "unknown error".to_string())
                            ));
                        }
                    }
                }
            }

            _ = reset.elapsed() => {
                machine.apply_reset();
                Output::info("Waiting for the next link.");
            }

            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    // Pending reset timers must not outlive the loop that consumes them.
    machine.shutdown();
    Ok(())
}

/// Kick off a conversion in the background; its progress and completion come
/// back through the service's event stream.
fn trigger_conversion(service: &Arc<ConvertService>, url: &str) {
    let service = service.clone();
    let url = url.to_string();
    tokio::spawn(async move {
        if let Err(e) = service.convert(&url).await {
            warn!("Conversion could not be started: {}", e);
        }
    });
}
