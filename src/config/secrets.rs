//! Credential storage for rectap.
//!
//! The transcription API key is kept out of the main config file and stored
//! with restricted permissions in the user's local data directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Saves the transcription API key, creating the credentials file with
/// owner-only permissions.
///
/// # Errors
/// - If the data directory cannot be determined or created
/// - If the credentials file cannot be written
pub fn save_api_key(api_key: &str) -> Result<()> {
    let path = credentials_path()?;
    fs::write(&path, api_key.trim())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    tracing::info!("API key saved to {}", path.display());
    Ok(())
}

/// Reads the stored transcription API key, if any.
///
/// # Errors
/// - If the data directory cannot be determined
/// - If the credentials file exists but cannot be read
pub fn get_api_key() -> Result<Option<String>> {
    let path = credentials_path()?;
    if !path.exists() {
        return Ok(None);
    }

    let key = fs::read_to_string(&path)?.trim().to_string();
    if key.is_empty() {
        return Ok(None);
    }

    Ok(Some(key))
}

/// Removes the stored API key.
///
/// # Errors
/// - If the credentials file exists but cannot be removed
pub fn clear_api_key() -> Result<()> {
    let path = credentials_path()?;
    if path.exists() {
        fs::remove_file(&path)?;
        tracing::info!("API key cleared");
    }
    Ok(())
}

/// Path of the credentials file, creating the data directory if needed.
fn credentials_path() -> Result<PathBuf> {
    let data_dir = super::data_dir()?;
    fs::create_dir_all(&data_dir)
        .map_err(|e| anyhow!("Failed to create data directory: {e}"))?;
    Ok(data_dir.join("credentials"))
}
