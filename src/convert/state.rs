//! The clipboard-driven conversion state machine.
//!
//! Maps clipboard changes and conversion events onto a small set of states
//! and schedules the automatic return to idle after a terminal state. The
//! machine itself is synchronous; its owner feeds it events from the
//! clipboard watcher and the convert service, and listens on the
//! [`ResetSignal`] for the auto-reset timer.

use super::service::ConvertEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay between entering a terminal state and the automatic reset.
pub const AUTO_RESET_DELAY: Duration = Duration::from_millis(3000);

/// The state of the conversion flow. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertState {
    /// Idle, waiting for a video link to land on the clipboard.
    WaitingForClipboardContent,
    /// The clipboard holds a convertible link.
    HasValidClipboardContent,
    /// A conversion is running.
    Converting,
    /// Terminal: the last conversion succeeded.
    Successful,
    /// Terminal: the last conversion failed.
    Failed,
    /// The transcoder was missing at startup; resolved only by restart.
    FfmpegNotFound,
}

/// Receiver for the auto-reset timer.
///
/// Fires once per terminal state, after [`AUTO_RESET_DELAY`]. The owner
/// awaits it alongside the other event sources and calls
/// [`ConvertStateMachine::apply_reset`] when it fires.
pub struct ResetSignal {
    rx: mpsc::Receiver<()>,
}

impl ResetSignal {
    /// Wait until a scheduled reset delay elapses.
    pub async fn elapsed(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

/// State machine coordinating clipboard content and conversion progress.
pub struct ConvertStateMachine {
    state: ConvertState,
    download_url: Option<String>,
    progress_percent: f32,
    reset_delay: Duration,
    reset_tx: mpsc::Sender<()>,
    pending_reset: Option<JoinHandle<()>>,
}

impl ConvertStateMachine {
    /// Create the machine from the startup prerequisites check.
    pub fn new(prerequisites_ok: bool) -> (Self, ResetSignal) {
        Self::with_reset_delay(prerequisites_ok, AUTO_RESET_DELAY)
    }

    /// Create the machine with a custom auto-reset delay.
    pub fn with_reset_delay(prerequisites_ok: bool, reset_delay: Duration) -> (Self, ResetSignal) {
        let (reset_tx, rx) = mpsc::channel(4);

        let state = if prerequisites_ok {
            ConvertState::WaitingForClipboardContent
        } else {
            ConvertState::FfmpegNotFound
        };

        let machine = Self {
            state,
            download_url: None,
            progress_percent: 0.0,
            reset_delay,
            reset_tx,
            pending_reset: None,
        };

        (machine, ResetSignal { rx })
    }

    /// Current state.
    pub fn state(&self) -> ConvertState {
        self.state
    }

    /// The clipboard-derived candidate URL, when one is held.
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    /// Last progress percentage mirrored from the converter.
    pub fn progress_percent(&self) -> f32 {
        self.progress_percent
    }

    /// Feed a clipboard change into the machine.
    ///
    /// Ignored unless the machine is idle or already holding a link: a
    /// running conversion, a terminal state awaiting its reset, and the
    /// missing-transcoder state must not be disturbed by clipboard activity.
    pub fn handle_clipboard(&mut self, text: &str) {
        match self.state {
            ConvertState::WaitingForClipboardContent | ConvertState::HasValidClipboardContent => {
                if super::is_video_url_convertible(text) {
                    debug!("Clipboard holds a convertible link");
                    self.download_url = Some(text.trim().to_string());
                    self.state = ConvertState::HasValidClipboardContent;
                } else {
                    self.download_url = None;
                    self.state = ConvertState::WaitingForClipboardContent;
                }
            }
            _ => {
                debug!("Ignoring clipboard change in state {:?}", self.state);
            }
        }
    }

    /// Feed a conversion event into the machine.
    pub fn handle_event(&mut self, event: &ConvertEvent) {
        match event {
            ConvertEvent::Started { url } => {
                debug!("Conversion started for {}", url);
                self.progress_percent = 0.0;
                self.state = ConvertState::Converting;
            }
            ConvertEvent::Progress(percent) => {
                self.progress_percent = *percent;
            }
            ConvertEvent::Completed(result) => {
                self.state = if result.success {
                    ConvertState::Successful
                } else {
                    ConvertState::Failed
                };
                self.schedule_reset();
            }
        }
    }

    /// Return to idle after a terminal state.
    ///
    /// Called by the owner when the [`ResetSignal`] fires. A signal arriving
    /// outside a terminal state (the timer was superseded) is ignored.
    pub fn apply_reset(&mut self) {
        if !matches!(self.state, ConvertState::Successful | ConvertState::Failed) {
            debug!("Ignoring stale reset in state {:?}", self.state);
            return;
        }

        self.state = ConvertState::WaitingForClipboardContent;
        self.download_url = None;
        self.progress_percent = 0.0;
        self.pending_reset = None;
    }

    /// Cancel any pending auto-reset. Must run on teardown so the timer
    /// cannot fire into a dismantled owner.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.pending_reset.take() {
            handle.abort();
        }
    }

    fn schedule_reset(&mut self) {
        // A new terminal state supersedes any timer still in flight.
        if let Some(previous) = self.pending_reset.take() {
            previous.abort();
        }

        let tx = self.reset_tx.clone();
        let delay = self.reset_delay;
        self.pending_reset = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(()).await;
        }));
    }
}

impl Drop for ConvertStateMachine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
