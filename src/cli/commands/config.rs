//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply one `key = value` assignment and persist it.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "audio_format" => {
            let format = value
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            settings.set_audio_format(format)?;
        }
        "audio_bitrate" => {
            let bitrate = value
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            settings.set_audio_bitrate(bitrate)?;
        }
        "check_for_updates" => {
            settings.updates.check_for_updates = parse_bool(value)?;
            settings.save()?;
        }
        "use_system_title_bar" => {
            settings.ui.use_system_title_bar = parse_bool(value)?;
            settings.save()?;
        }
        other => {
            anyhow::bail!(
                "Unknown key '{}'. Valid keys: audio_format, audio_bitrate, check_for_updates, use_system_title_bar",
                other
            );
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => anyhow::bail!("Expected a boolean, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_set_unknown_key_fails() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "no_such_key", "1").is_err());
    }
}
