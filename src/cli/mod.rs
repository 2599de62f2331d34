//! CLI module for Hent.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Hent - Clipboard-to-Audio Converter
///
/// Watches the clipboard for YouTube links and converts them to audio files
/// using yt-dlp and ffmpeg. The name "Hent" comes from the Norwegian/
/// Scandinavian word for "fetch."
#[derive(Parser, Debug)]
#[command(name = "hent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the clipboard and convert links as they are copied
    Watch {
        /// Convert immediately when a link lands, without waiting for Enter
        #[arg(short, long)]
        auto: bool,
    },

    /// Convert a single video URL to audio
    Convert {
        /// Video URL
        url: String,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Download missing dependency binaries into the managed folder
    Setup,

    /// Update the managed yt-dlp copy
    Update,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,

    /// Set a configuration value and persist it
    Set {
        /// One of: audio_format, audio_bitrate, check_for_updates, use_system_title_bar
        key: String,
        /// New value
        value: String,
    },

    /// Print the configuration file path
    Path,
}
