//! Configuration module for Hent.
//!
//! Handles loading and managing application settings, including the persisted
//! conversion format/bitrate selection.

mod settings;

pub use settings::{
    ConversionSettings, DependencySettings, GeneralSettings, Settings, UiSettings,
    UpdateSettings,
};
