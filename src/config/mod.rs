//! Configuration management for rectap.
//!
//! This module handles loading and saving application configuration from TOML files,
//! as well as storage of the transcription API key. Configuration is stored in the
//! user's config directory, while credentials are stored with restricted permissions
//! in the user's local data directory.

pub mod file;
pub mod secrets;

use std::path::PathBuf;

pub use file::{ensure_config, get_config_path, ActionRule, RectapConfig};
pub use secrets::{clear_api_key, get_api_key, save_api_key};

/// Application data directory (`~/.local/share/rectap`).
///
/// Holds recordings, the transcript history database and credentials.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".local").join("share").join("rectap"))
}
