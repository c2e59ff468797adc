//! Configuration file management for rectap.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Companion endpoint notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Whether session transitions are announced at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL of the companion endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path POSTed when a session starts
    #[serde(default = "default_start_path")]
    pub start_path: String,
    /// Path POSTed when a session stops
    #[serde(default = "default_stop_path")]
    pub stop_path: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            start_path: default_start_path(),
            stop_path: default_stop_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8787".to_string()
}

fn default_start_path() -> String {
    "/record".to_string()
}

fn default_stop_path() -> String {
    "/stop_recording".to_string()
}

/// Background media playback configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Media file played while a session is active (none disables playback)
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Player binary. Leave unset to probe mpv, ffplay and friends on PATH
    #[serde(default)]
    pub player: Option<String>,
    /// Player arguments. Leave empty for per-player quiet/loop defaults
    #[serde(default)]
    pub player_args: Vec<String>,
}

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for the system default device
    /// - numeric index (0, 1, 2, etc.) from `rectap list-devices`
    /// - device name from `rectap list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Requested sample rate in Hz (16000 recommended for speech recognition)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
        }
    }
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

/// Transcription configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Whether recordings are transcribed after a session stops
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Add punctuation and capitalization
    #[serde(default = "default_true")]
    pub punctuate: bool,
    /// Apply text formatting to the transcript
    #[serde(default = "default_true")]
    pub format_text: bool,
    /// Enable automatic language detection
    #[serde(default)]
    pub language_detection: bool,
    /// Key terms to improve transcription accuracy
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            punctuate: true,
            format_text: true,
            language_detection: false,
            keywords: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A voice-triggered action: a transcript pattern and the command it runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRule {
    /// Regex matched against the transcript
    pub pattern: String,
    /// Command executed when the pattern matches
    pub command: String,
    /// Arguments for the command
    #[serde(default)]
    pub args: Vec<String>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectapConfig {
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default = "default_actions")]
    pub actions: Vec<ActionRule>,
}

impl Default for RectapConfig {
    fn default() -> Self {
        Self {
            notify: NotifyConfig::default(),
            media: MediaConfig::default(),
            audio: AudioConfig::default(),
            transcription: TranscriptionConfig::default(),
            actions: default_actions(),
        }
    }
}

/// Default voice actions. Only macOS ships app launchers out of the box.
fn default_actions() -> Vec<ActionRule> {
    if cfg!(target_os = "macos") {
        vec![
            ActionRule {
                pattern: r"(?i)\bweather\b".to_string(),
                command: "open".to_string(),
                args: vec!["/System/Applications/Weather.app".to_string()],
            },
            ActionRule {
                pattern: r"(?i)\bcalculator\b".to_string(),
                command: "open".to_string(),
                args: vec!["/System/Applications/Calculator.app".to_string()],
            },
        ]
    } else {
        Vec::new()
    }
}

impl RectapConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        let config_content = fs::read_to_string(&config_path)?;
        let config: RectapConfig = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = get_config_path()?;
        let config_content = toml::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Writes a default config file if none exists yet.
///
/// Called early in the startup sequence so every command sees a config file.
///
/// # Errors
/// - If the config directory cannot be determined or created
/// - If the default config cannot be written
pub fn ensure_config() -> anyhow::Result<()> {
    let config_path = get_config_path()?;
    if config_path.exists() {
        return Ok(());
    }

    RectapConfig::default().save()?;
    tracing::info!("Default configuration written to {}", config_path.display());
    Ok(())
}

/// Retrieves the path to the config file, creating the directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    let config_dir = home.join(".config").join("rectap");

    fs::create_dir_all(&config_dir)?;

    Ok(config_dir.join("rectap.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = RectapConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: RectapConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.notify.base_url, "http://127.0.0.1:8787");
        assert_eq!(parsed.notify.start_path, "/record");
        assert_eq!(parsed.notify.stop_path, "/stop_recording");
        assert_eq!(parsed.audio.device, "default");
        assert_eq!(parsed.audio.sample_rate, 16000);
    }

    #[test]
    fn minimal_config_falls_back_to_defaults() {
        let parsed: RectapConfig = toml::from_str(
            r#"
            [audio]
            device = "2"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.audio.device, "2");
        assert_eq!(parsed.audio.sample_rate, 16000);
        assert!(parsed.notify.enabled);
        assert!(parsed.transcription.punctuate);
        assert!(parsed.media.file.is_none());
    }

    #[test]
    fn action_rules_parse_from_toml_tables() {
        let parsed: RectapConfig = toml::from_str(
            r#"
            [[actions]]
            pattern = "(?i)\\blights\\b"
            command = "light-switch"
            args = ["toggle"]
            "#,
        )
        .unwrap();

        assert_eq!(parsed.actions.len(), 1);
        assert_eq!(parsed.actions[0].command, "light-switch");
        assert_eq!(parsed.actions[0].args, vec!["toggle".to_string()]);
    }
}
