//! Conversion core: converter strategies, the convert service, and the
//! clipboard-driven state machine.

mod converter;
mod format;
mod service;
mod state;

pub use converter::{ConversionResult, ConvertRequest, VideoConverter, YtdlpConverter};
pub use format::{AudioBitrate, AudioFormat};
pub use service::{ConvertEvent, ConvertService, LastConverted};
pub use state::{ConvertState, ConvertStateMachine, ResetSignal, AUTO_RESET_DELAY};

/// Host substrings recognized as convertible video links.
///
/// Matching is a plain substring test, no URL parsing.
pub const KNOWN_VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// Whether clipboard text looks like a convertible video link.
///
/// True iff the text is non-blank and contains one of the known host
/// substrings. Pure and synchronous.
pub fn is_video_url_convertible(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    KNOWN_VIDEO_HOSTS.iter().any(|host| trimmed.contains(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hosts_are_convertible() {
        assert!(is_video_url_convertible("https://youtube.com/watch?v=abc"));
        assert!(is_video_url_convertible("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_video_url_convertible("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_video_url_convertible("  https://music.youtube.com/watch?v=x  "));
    }

    #[test]
    fn test_blank_and_unrelated_are_not_convertible() {
        assert!(!is_video_url_convertible(""));
        assert!(!is_video_url_convertible("   "));
        assert!(!is_video_url_convertible("hello world"));
        assert!(!is_video_url_convertible("https://example.com/watch?v=abc"));
    }
}
