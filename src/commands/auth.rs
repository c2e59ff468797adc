//! API key management.
//!
//! Stores the AssemblyAI API key in the credentials file with restricted
//! permissions, or clears it.

use std::io::{self, Write};

use crate::config;

/// Prompts for and stores the transcription API key.
///
/// With `clear` set, removes the stored key instead.
///
/// # Errors
/// - If reading from stdin fails
/// - If the credentials file cannot be written or removed
pub fn handle_auth(clear: bool) -> Result<(), anyhow::Error> {
    if clear {
        config::clear_api_key()?;
        println!("API key cleared.");
        return Ok(());
    }

    print!("Enter your AssemblyAI API key: ");
    io::stdout().flush()?;

    let mut key = String::new();
    io::stdin().read_line(&mut key)?;
    let key = key.trim();

    if key.is_empty() {
        return Err(anyhow::anyhow!("No API key entered"));
    }

    config::save_api_key(key)?;
    println!("API key saved.");
    Ok(())
}
