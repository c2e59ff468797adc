//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::config;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// Tap to record: toggle voice recording sessions from the terminal
#[derive(Parser)]
#[command(name = "rectap")]
#[command(version)]
#[command(about = "Tap to record: toggle voice recording sessions from the terminal")]
#[command(
    long_about = "Toggle voice recording sessions with a single keypress.\n\
While a session is active, a configurable background media file plays and\n\
microphone audio is captured. Toggling off saves the take, announces the\n\
transition to a companion endpoint, transcribes the audio and dispatches\n\
voice-triggered actions.\n\n\
DEFAULT COMMAND:\n\
    If no command is specified, 'session' is used by default.\n\n\
EXAMPLES:\n\
    # Run a recording session\n\
    $ rectap\n\n\
    # Toggle a running session from another terminal\n\
    $ pkill -USR1 rectap\n\n\
    # Transcribe an existing file and copy the result\n\
    $ rectap transcribe take.wav -c\n\n\
    # Store your transcription API key\n\
    $ rectap auth"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/rectap/rectap.toml\n    Recordings:         ~/.local/share/rectap/recordings\n    Logs:               ~/.local/state/rectap/rectap.log.*"
)]
struct Cli {
    /// Copy transcripts to the clipboard as well (session default command)
    #[arg(short, long, global = true)]
    clipboard: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive recording session (default)
    ///
    /// Space or Enter toggles recording, q or Escape quits. SIGUSR1 toggles
    /// externally. Each take is saved to the recordings directory and, when
    /// configured, transcribed.
    #[command(visible_alias = "s")]
    Session {
        /// Copy transcripts to the clipboard as well
        #[arg(short, long)]
        clipboard: bool,
    },

    /// Transcribe a pre-recorded audio file
    ///
    /// Transcribe an existing audio file using the configured options.
    ///
    /// Examples:
    ///   rectap transcribe take.wav
    ///   rectap transcribe voice-memo.wav -c
    ///   rectap transcribe meeting.wav -o transcript.txt
    #[command(visible_alias = "t")]
    Transcribe {
        /// Path to the audio file to transcribe
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Copy the transcript to clipboard instead of stdout
        #[arg(short, long)]
        clipboard: bool,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,
    },

    /// Store or clear the transcription API key
    ///
    /// The key is kept with owner-only permissions in the data directory,
    /// separate from the config file.
    #[command(visible_alias = "a")]
    Auth {
        /// Remove the stored API key
        #[arg(long)]
        clear: bool,
    },

    /// List recent transcripts
    #[command(visible_alias = "h")]
    History {
        /// Maximum number of entries to show
        #[arg(value_name = "N")]
        limit: Option<usize>,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Edit endpoint, media, audio and action settings.
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the correct input device in rectap.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   rectap completions bash > rectap.bash
    ///   rectap completions zsh > _rectap
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If the default configuration cannot be written
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or config setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "rectap", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            return match commands::handle_list_devices() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands
    logging::init_logging()?;

    // Write a default config file on first run
    config::ensure_config()?;

    // Route to appropriate command handler
    match cli.command {
        None | Some(Commands::Session { .. }) => {
            // Default command is session
            // Merge top-level options with explicit session command options
            let clipboard = match cli.command {
                Some(Commands::Session { clipboard }) => clipboard || cli.clipboard,
                None => cli.clipboard,
                _ => unreachable!(),
            };
            commands::handle_session(clipboard).await?;
        }
        Some(Commands::Transcribe {
            file,
            clipboard,
            output,
        }) => {
            commands::handle_transcribe(file, clipboard, output).await?;
        }
        Some(Commands::Auth { clear }) => {
            commands::handle_auth(clear)?;
        }
        Some(Commands::History { limit }) => {
            commands::handle_history(limit)?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
