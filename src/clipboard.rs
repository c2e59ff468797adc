//! Clipboard utilities for rectap.
//!
//! Handles copying transcripts to the system clipboard using pbcopy (macOS),
//! wl-copy (Wayland) or xclip (X11). Clipboard failures are never fatal.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// Clipboard tools probed in order, with their arguments.
#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &["--type", "text/plain", "--trim-newline"]),
    ("xclip", &["-selection", "clipboard", "-in", "-quiet"]),
];
#[cfg(not(target_os = "macos"))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &["--type", "text/plain", "--trim-newline"]),
    ("xclip", &["-selection", "clipboard", "-in", "-quiet"]),
];

/// Copies text to the system clipboard.
///
/// Tries the platform's clipboard tools in order and stops at the first that
/// accepts the text. Does not fail if no clipboard tool is available, so a
/// transcription succeeds regardless.
pub fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    for (tool, args) in CLIPBOARD_TOOLS {
        match pipe_to_tool(tool, args, text) {
            Ok(()) => {
                tracing::debug!("Transcript copied to clipboard via {tool}");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!("Clipboard tool {tool} unavailable: {e}");
            }
        }
    }

    tracing::warn!("No clipboard tool available");
    Ok(())
}

/// Pipes text into a clipboard tool's stdin.
fn pipe_to_tool(tool: &str, args: &[&str], text: &str) -> anyhow::Result<()> {
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow::anyhow!("No stdin handle for {tool}"))?;
    write!(stdin, "{text}")?;
    drop(stdin);

    // Give the tool a moment to take ownership of the selection.
    thread::sleep(Duration::from_millis(100));
    Ok(())
}
