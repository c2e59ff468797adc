//! List recent transcripts from the history database.

use crate::config;
use crate::history::HistoryManager;

const DEFAULT_LIMIT: usize = 20;

/// Prints the most recent transcripts, newest first.
///
/// # Errors
/// - If the history database cannot be opened or queried
pub fn handle_history(limit: Option<usize>) -> Result<(), anyhow::Error> {
    let mut history = HistoryManager::new(&config::data_dir()?)?;
    let entries = history.recent_transcripts(limit.unwrap_or(DEFAULT_LIMIT))?;

    if entries.is_empty() {
        println!("No transcripts yet. Run 'rectap' to record one.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "[{}] {}",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.text
        );
        if let Some(path) = &entry.audio_path {
            println!("    audio: {}", path.display());
        }
    }

    Ok(())
}
