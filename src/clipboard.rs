//! Clipboard polling and change notification.
//!
//! Watches the system clipboard and emits the current text every time it
//! changes. The watcher runs on a blocking task because clipboard handles
//! must stay on the thread that created them; consumers receive changes
//! over an async channel and never touch the clipboard directly.

use crate::error::{HentError, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default clipboard poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Receiving end of the clipboard change stream.
pub struct ClipboardEvents {
    rx: mpsc::Receiver<String>,
}

impl ClipboardEvents {
    /// Wait for the next clipboard change.
    ///
    /// Returns `None` once the watcher task has stopped.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Spawn the clipboard watcher.
///
/// Polls the clipboard at `poll_interval` and sends the text over the
/// returned channel whenever it differs from the previous poll. The watcher
/// stops on its own when the [`ClipboardEvents`] receiver is dropped.
pub fn spawn_watcher(poll_interval: Duration) -> Result<ClipboardEvents> {
    let (tx, rx) = mpsc::channel(16);

    // Creating the handle here surfaces "no clipboard available" (e.g. a
    // headless session) as an immediate error instead of a silent dead task.
    arboard::Clipboard::new()
        .map_err(|e| HentError::Clipboard(format!("Cannot access clipboard: {}", e)))?;

    tokio::task::spawn_blocking(move || {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(c) => c,
            Err(e) => {
                warn!("Clipboard watcher failed to start: {}", e);
                return;
            }
        };

        // Baseline read so the content present at startup is not re-emitted.
        let mut last = clipboard.get_text().unwrap_or_default();

        loop {
            std::thread::sleep(poll_interval);

            // Non-text content reads as an error; treat it as empty.
            let current = clipboard.get_text().unwrap_or_default();

            if current != last {
                debug!("Clipboard changed ({} chars)", current.len());
                last = current.clone();

                if tx.blocking_send(current).is_err() {
                    // Receiver dropped, watcher is being torn down.
                    break;
                }
            }
        }
    });

    Ok(ClipboardEvents { rx })
}
