//! Interactive recording session.
//!
//! Runs the toggle loop: Space or Enter toggles the recording session,
//! `q` or Escape quits. Sending SIGUSR1 to the process toggles externally,
//! so hotkey daemons can drive a session without focusing the terminal.
//! While a session is active the background media plays and microphone
//! audio is captured; toggling off saves the capture and, when configured,
//! transcribes it, dispatches voice actions and stores the transcript.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tokio::task::JoinHandle;

use crate::actions;
use crate::capture::AudioCapture;
use crate::clipboard::copy_to_clipboard;
use crate::config::{self, RectapConfig};
use crate::history::HistoryManager;
use crate::session::{BackgroundPlayer, HttpNotifier, Notifier, SessionController};
use crate::transcription;

/// Interval between input polls while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the interactive recording session.
///
/// # Arguments
/// * `clipboard` - If true, copy each transcript to the clipboard as well
pub async fn handle_session(clipboard: bool) -> Result<(), anyhow::Error> {
    tracing::info!("=== rectap Session Started ===");

    let config_data = match RectapConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            return Err(anyhow::anyhow!(
                "Configuration error: {err}\n\nPlease check your ~/.config/rectap/rectap.toml file and try again."
            ));
        }
    };

    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz, notify={}, media={}",
        config_data.audio.device,
        config_data.audio.sample_rate,
        config_data.notify.enabled,
        config_data
            .media
            .file
            .as_ref()
            .map(|f| f.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    let notifier = if config_data.notify.enabled {
        Notifier::Http(HttpNotifier::new(
            &config_data.notify.base_url,
            &config_data.notify.start_path,
            &config_data.notify.stop_path,
        )?)
    } else {
        Notifier::Disabled
    };

    let player = BackgroundPlayer::new(
        config_data.media.file.clone(),
        config_data.media.player.clone(),
        config_data.media.player_args.clone(),
    );

    let mut controller = SessionController::new(player, Arc::new(notifier));
    let mut capture = AudioCapture::new(
        config_data.audio.sample_rate,
        config_data.audio.device.clone(),
    );

    let recordings_dir = config::data_dir()?.join("recordings");
    std::fs::create_dir_all(&recordings_dir)?;

    // External toggle trigger, e.g. from a hotkey daemon: pkill -USR1 rectap
    let external_toggle = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&external_toggle))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    enable_raw_mode()?;
    status_line("rectap session: Space/Enter toggles recording, q quits");
    status_line("idle");

    let result = session_loop(
        &mut controller,
        &mut capture,
        &config_data,
        &recordings_dir,
        &external_toggle,
        clipboard,
    )
    .await;

    disable_raw_mode()?;
    result?;

    tracing::info!("=== rectap Session Exited ===");
    Ok(())
}

/// The toggle loop. Returns when the user quits.
async fn session_loop(
    controller: &mut SessionController<BackgroundPlayer, Notifier>,
    capture: &mut AudioCapture,
    config_data: &RectapConfig,
    recordings_dir: &std::path::Path,
    external_toggle: &AtomicBool,
    clipboard: bool,
) -> Result<(), anyhow::Error> {
    let mut pending: Vec<JoinHandle<()>> = Vec::new();

    loop {
        let mut toggle_requested = external_toggle.swap(false, Ordering::Relaxed);
        if toggle_requested {
            tracing::info!("Received SIGUSR1: toggling via external trigger");
        }

        let mut quit_requested = false;
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char(' ') | KeyCode::Enter => toggle_requested = true,
                        KeyCode::Char('q') | KeyCode::Esc => quit_requested = true,
                        _ => {}
                    }
                }
            }
        }

        if quit_requested {
            // Stop cleanly so the final take is saved and announced.
            if controller.is_recording() {
                let notification = controller.toggle();
                finish_take(capture, config_data, recordings_dir, clipboard, &mut pending);
                notification.await.ok();
            }
            break;
        }

        if toggle_requested {
            if controller.is_recording() {
                drop(controller.toggle());
                finish_take(capture, config_data, recordings_dir, clipboard, &mut pending);
                status_line("idle");
            } else {
                drop(controller.toggle());
                if let Err(e) = capture.start() {
                    tracing::error!("Failed to start capture: {e}");
                    status_line(&format!("recording (capture failed: {e})"));
                } else {
                    status_line("recording");
                }
            }
        }
    }

    if !pending.is_empty() {
        status_line("waiting for transcriptions to finish...");
        for handle in pending {
            handle.await.ok();
        }
    }

    Ok(())
}

/// Stops the capture, saves the take and spawns the transcription job.
fn finish_take(
    capture: &mut AudioCapture,
    config_data: &RectapConfig,
    recordings_dir: &std::path::Path,
    clipboard: bool,
    pending: &mut Vec<JoinHandle<()>>,
) {
    let buffered_secs = capture.sample_count() as f32 / capture.sample_rate() as f32;
    tracing::debug!("Finishing take: {:.1}s buffered", buffered_secs);

    let filename = format!(
        "rectap-{}.wav",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    let wav_path = recordings_dir.join(filename);

    match capture.stop(&wav_path) {
        Ok(true) => {
            if config_data.transcription.enabled {
                if let Some(handle) = spawn_transcription(config_data, wav_path, clipboard) {
                    pending.push(handle);
                }
            }
        }
        Ok(false) => {
            tracing::debug!("Empty take, nothing to transcribe");
        }
        Err(e) => {
            tracing::error!("Failed to save capture: {e}");
        }
    }
}

/// Spawns the transcribe → dispatch → history pipeline for a saved take.
///
/// Returns None when no API key is configured; the take stays on disk and
/// can be transcribed later with `rectap transcribe`.
fn spawn_transcription(
    config_data: &RectapConfig,
    wav_path: PathBuf,
    clipboard: bool,
) -> Option<JoinHandle<()>> {
    let api_key = match config::get_api_key() {
        Ok(Some(key)) => key,
        Ok(None) => {
            tracing::warn!(
                "No API key configured; skipping transcription. Run 'rectap auth' to set one."
            );
            status_line("saved (no API key, transcription skipped)");
            return None;
        }
        Err(e) => {
            tracing::error!("Failed to read API key: {e}");
            return None;
        }
    };

    let options = config_data.transcription.clone();
    let rules = config_data.actions.clone();

    Some(tokio::spawn(async move {
        match transcription::transcribe(&api_key, &options, &wav_path).await {
            Ok(text) => {
                tracing::info!("Transcript: {text}");
                status_line(&format!("transcript: {text}"));

                actions::dispatch(&rules, &text);

                match config::data_dir().and_then(|dir| HistoryManager::new(&dir)) {
                    Ok(mut history) => {
                        if let Err(e) = history.save_transcript(&text, Some(&wav_path)) {
                            tracing::warn!("Failed to save transcript to history: {e}");
                        }
                    }
                    Err(e) => tracing::warn!("Failed to open history: {e}"),
                }

                if clipboard {
                    if let Err(e) = copy_to_clipboard(&text) {
                        tracing::warn!("Failed to copy to clipboard: {e}");
                    }
                }
            }
            Err(e) => {
                tracing::error!("Transcription failed: {e}");
                status_line(&format!("transcription failed: {e}"));
            }
        }
    }))
}

/// Prints a status line that behaves in raw terminal mode.
fn status_line(message: &str) {
    print!("{message}\r\n");
    std::io::stdout().flush().ok();
}
