//! Application command handlers for rectap.
//!
//! This module organizes command handling into separate submodules, each responsible for a specific
//! application command.
//!
//! # Commands
//! - `session`: Interactive recording toggle session (default)
//! - `transcribe`: Transcribe a pre-recorded audio file
//! - `auth`: API key management for the transcription provider
//! - `history`: List recent transcripts
//! - `config`: Open configuration file in user's preferred editor
//! - `list_devices`: List available audio input devices
//! - `logs`: Display recent log entries

pub mod auth;
pub mod config;
pub mod history;
pub mod list_devices;
pub mod logs;
pub mod session;
pub mod transcribe;

pub use auth::handle_auth;
pub use config::handle_config;
pub use history::handle_history;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use session::handle_session;
pub use transcribe::handle_transcribe;
