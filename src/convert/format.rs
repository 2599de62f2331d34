//! Selectable audio output formats and bitrates.

use serde::{Deserialize, Serialize};

/// Audio output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    M4a,
    Ogg,
    Opus,
    Flac,
    Wav,
}

impl AudioFormat {
    /// All selectable formats, in display order.
    pub const ALL: [AudioFormat; 6] = [
        AudioFormat::Mp3,
        AudioFormat::M4a,
        AudioFormat::Ogg,
        AudioFormat::Opus,
        AudioFormat::Flac,
        AudioFormat::Wav,
    ];

    /// File extension (and yt-dlp `--audio-format` value) for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Ogg => "vorbis",
            AudioFormat::Opus => "opus",
            AudioFormat::Flac => "flac",
            AudioFormat::Wav => "wav",
        }
    }

    /// Extension of the file yt-dlp produces for this format.
    pub fn file_extension(&self) -> &'static str {
        match self {
            AudioFormat::Ogg => "ogg",
            other => other.extension(),
        }
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "m4a" => Ok(AudioFormat::M4a),
            "ogg" | "vorbis" => Ok(AudioFormat::Ogg),
            "opus" => Ok(AudioFormat::Opus),
            "flac" => Ok(AudioFormat::Flac),
            "wav" => Ok(AudioFormat::Wav),
            _ => Err(format!("Unknown audio format: {}", s)),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Ogg => write!(f, "ogg"),
            other => write!(f, "{}", other.extension()),
        }
    }
}

/// Audio output bitrate in kbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AudioBitrate {
    #[serde(rename = "96")]
    Kbps96,
    #[serde(rename = "128")]
    Kbps128,
    #[default]
    #[serde(rename = "192")]
    Kbps192,
    #[serde(rename = "256")]
    Kbps256,
    #[serde(rename = "320")]
    Kbps320,
}

impl AudioBitrate {
    /// All selectable bitrates, in ascending order.
    pub const ALL: [AudioBitrate; 5] = [
        AudioBitrate::Kbps96,
        AudioBitrate::Kbps128,
        AudioBitrate::Kbps192,
        AudioBitrate::Kbps256,
        AudioBitrate::Kbps320,
    ];

    /// Bitrate value in kbit/s.
    pub fn kbps(&self) -> u32 {
        match self {
            AudioBitrate::Kbps96 => 96,
            AudioBitrate::Kbps128 => 128,
            AudioBitrate::Kbps192 => 192,
            AudioBitrate::Kbps256 => 256,
            AudioBitrate::Kbps320 => 320,
        }
    }
}

impl std::str::FromStr for AudioBitrate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_end_matches('k').trim_end_matches("kbps") {
            "96" => Ok(AudioBitrate::Kbps96),
            "128" => Ok(AudioBitrate::Kbps128),
            "192" => Ok(AudioBitrate::Kbps192),
            "256" => Ok(AudioBitrate::Kbps256),
            "320" => Ok(AudioBitrate::Kbps320),
            _ => Err(format!("Unknown audio bitrate: {}", s)),
        }
    }
}

impl std::fmt::Display for AudioBitrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kbps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trip() {
        for format in AudioFormat::ALL {
            let parsed: AudioFormat = format.to_string().parse().unwrap();
            assert_eq!(parsed, format);
        }
    }

    #[test]
    fn test_bitrate_parse() {
        assert_eq!("192".parse::<AudioBitrate>().unwrap(), AudioBitrate::Kbps192);
        assert_eq!("320k".parse::<AudioBitrate>().unwrap(), AudioBitrate::Kbps320);
        assert!("512".parse::<AudioBitrate>().is_err());
    }

    #[test]
    fn test_ogg_maps_to_vorbis_codec() {
        assert_eq!(AudioFormat::Ogg.extension(), "vorbis");
        assert_eq!(AudioFormat::Ogg.file_extension(), "ogg");
        assert_eq!(AudioFormat::Ogg.to_string(), "ogg");
    }
}
