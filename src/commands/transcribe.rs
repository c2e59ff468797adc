//! Transcribe a pre-recorded audio file without running a session.
//!
//! Accepts an audio file path and transcribes it with the configured options,
//! reusing the same transcription pipeline as the session command.

use std::path::PathBuf;

use crate::clipboard::copy_to_clipboard;
use crate::config::{self, RectapConfig};
use crate::history::HistoryManager;
use crate::transcription;

/// Handles transcription of a pre-recorded audio file.
///
/// # Arguments
/// * `file` - Path to the audio file to transcribe
/// * `clipboard` - If true, copy to clipboard instead of stdout
/// * `output_file` - Optional file path to write output to instead of stdout
pub async fn handle_transcribe(
    file: PathBuf,
    clipboard: bool,
    output_file: Option<String>,
) -> Result<(), anyhow::Error> {
    tracing::info!("=== rectap Transcribe Command ===");

    if !file.exists() {
        return Err(anyhow::anyhow!("Audio file not found: {}", file.display()));
    }

    tracing::info!("Transcribing file: {}", file.display());

    let config_data = match RectapConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    let api_key = config::get_api_key()?
        .ok_or_else(|| anyhow::anyhow!("No API key configured. Please run 'rectap auth'"))?;

    tracing::debug!("Starting transcription...");
    let text = transcription::transcribe(&api_key, &config_data.transcription, &file)
        .await
        .map_err(|e| {
            tracing::error!("Transcription failed: {e}");
            anyhow::anyhow!("Transcription failed: {e}")
        })?;

    // Save to history
    let mut history = HistoryManager::new(&config::data_dir()?)?;
    if let Err(e) = history.save_transcript(&text, Some(&file)) {
        tracing::warn!("Failed to save transcript to history: {e}");
    }

    // Determine output destination: file > clipboard > stdout (default)
    if let Some(file_path) = output_file {
        std::fs::write(&file_path, &text)
            .map_err(|e| anyhow::anyhow!("Failed to write to file '{file_path}': {e}"))?;
        tracing::debug!("Transcript written to file: {file_path}");
    } else if clipboard {
        if let Err(e) = copy_to_clipboard(&text) {
            tracing::warn!("Failed to copy to clipboard: {e}");
        }
    } else {
        println!("{text}");
    }

    Ok(())
}
