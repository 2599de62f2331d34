//! Hent - Clipboard-to-Audio Converter
//!
//! A desktop companion tool that watches the clipboard for YouTube links and
//! converts them to audio files using yt-dlp and ffmpeg.
//!
//! The name "Hent" comes from the Norwegian/Scandinavian word for "fetch."
//!
//! # Overview
//!
//! Hent allows you to:
//! - Watch the clipboard and pick up YouTube links as you copy them
//! - Convert videos to audio in a configurable format and bitrate
//! - Download and manage the yt-dlp/ffmpeg binaries when they are missing
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and the persisted settings store
//! - `clipboard` - Clipboard polling and change notification
//! - `dependency` - External binary availability checks and downloads
//! - `convert` - Conversion service, converter strategies, and the state machine
//! - `cli` - Command-line front-end
//!
//! # Example
//!
//! ```rust,no_run
//! use hent::config::Settings;
//! use hent::convert::ConvertService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let service = ConvertService::new(settings);
//!
//!     let result = service.convert("https://youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     if result.success {
//!         println!("Saved {:?}", result.output_path);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod convert;
pub mod dependency;
pub mod error;

pub use error::{HentError, Result};
