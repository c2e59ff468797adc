//! Background media playback for recording sessions.
//!
//! Plays a configured media file through a system media player while a
//! session is active. The player child process is suspended and resumed
//! with SIGSTOP/SIGCONT on Unix; elsewhere pausing terminates the child
//! and the next play respawns it.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use anyhow::{anyhow, Result};

/// Playable media handle driven by the session controller.
pub trait MediaControl {
    /// Starts or resumes playback.
    fn play(&mut self) -> Result<()>;

    /// Pauses playback.
    fn pause(&mut self) -> Result<()>;

    /// Returns whether playback is currently paused.
    fn is_paused(&self) -> bool;
}

/// Media players probed, in order, when none is configured.
#[cfg(target_os = "macos")]
const PLAYER_CANDIDATES: &[&str] = &["mpv", "ffplay", "afplay"];
#[cfg(not(target_os = "macos"))]
const PLAYER_CANDIDATES: &[&str] = &["mpv", "ffplay", "mplayer"];

/// Plays the configured background media file on loop.
///
/// With no media file configured, every operation is a logged no-op so the
/// session controller behaves identically either way.
pub struct BackgroundPlayer {
    media_file: Option<PathBuf>,
    player: Option<PathBuf>,
    player_args: Vec<String>,
    child: Option<Child>,
    paused: bool,
}

impl BackgroundPlayer {
    /// Creates a player for the given media file.
    ///
    /// Resolves the player binary up front: the configured one if set,
    /// otherwise the first of the candidates found on PATH. Resolution
    /// failures disable playback rather than failing the session.
    pub fn new(
        media_file: Option<PathBuf>,
        player: Option<String>,
        player_args: Vec<String>,
    ) -> Self {
        let resolved = if media_file.is_some() {
            match resolve_player(player.as_deref()) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Background media disabled: {e}");
                    None
                }
            }
        } else {
            None
        };

        Self {
            media_file,
            player: resolved,
            player_args,
            child: None,
            paused: true,
        }
    }

    /// Spawns the player process on the configured media file.
    fn spawn_player(&mut self) -> Result<()> {
        let (player, file) = match (&self.player, &self.media_file) {
            (Some(player), Some(file)) => (player, file),
            _ => return Ok(()),
        };

        let args = if self.player_args.is_empty() {
            default_player_args(player)
        } else {
            self.player_args.clone()
        };

        let child = Command::new(player)
            .args(&args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| anyhow!("Failed to start player '{}': {e}", player.display()))?;

        tracing::debug!(
            "Background player started: {} {} (pid {})",
            player.display(),
            file.display(),
            child.id()
        );
        self.child = Some(child);
        Ok(())
    }
}

impl MediaControl for BackgroundPlayer {
    fn play(&mut self) -> Result<()> {
        self.paused = false;

        if self.media_file.is_none() || self.player.is_none() {
            tracing::debug!("No background media configured, play is a no-op");
            return Ok(());
        }

        // Drop a child that exited on its own (non-looping player, bad file).
        let exited = match self.child.as_mut() {
            Some(child) => child.try_wait()?.is_some(),
            None => false,
        };
        if exited {
            self.child = None;
        }

        if self.child.is_none() {
            return self.spawn_player();
        }
        if let Some(child) = self.child.as_ref() {
            resume_child(child)?;
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.paused = true;

        #[cfg(unix)]
        if let Some(child) = self.child.as_ref() {
            suspend_child(child)?;
        }

        // No process suspension available; stop the child and respawn on
        // the next play.
        #[cfg(not(unix))]
        if let Some(mut child) = self.child.take() {
            child.kill().ok();
            child.wait().ok();
        }

        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Drop for BackgroundPlayer {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            child.kill().ok();
            child.wait().ok();
        }
    }
}

/// Suspends the player child process.
#[cfg(unix)]
fn suspend_child(child: &Child) -> Result<()> {
    signal_child(child, libc::SIGSTOP)
}

/// Resumes a suspended player child process.
#[cfg(unix)]
fn resume_child(child: &Child) -> Result<()> {
    signal_child(child, libc::SIGCONT)
}

#[cfg(not(unix))]
fn resume_child(_child: &Child) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn signal_child(child: &Child, signal: libc::c_int) -> Result<()> {
    let result = unsafe { libc::kill(child.id() as libc::pid_t, signal) };
    if result == -1 {
        return Err(anyhow!(
            "Failed to signal player process {}: {}",
            child.id(),
            std::io::Error::last_os_error()
        ));
    }
    Ok(())
}

/// Resolves the media player binary to use.
///
/// A configured player is looked up as-is (absolute path or PATH search);
/// otherwise the candidate list is probed in order.
fn resolve_player(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(player) = configured {
        let path = PathBuf::from(player);
        if path.is_absolute() && path.exists() {
            return Ok(path);
        }
        return find_in_path(player);
    }

    for candidate in PLAYER_CANDIDATES {
        if let Ok(path) = find_in_path(candidate) {
            return Ok(path);
        }
    }

    Err(anyhow!(
        "No media player found. Install one of: {}",
        PLAYER_CANDIDATES.join(", ")
    ))
}

/// Default arguments for the known players: quiet, looping playback.
fn default_player_args(player: &PathBuf) -> Vec<String> {
    let name = player
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    match name {
        "mpv" => vec![
            "--no-terminal".to_string(),
            "--really-quiet".to_string(),
            "--loop-file=inf".to_string(),
        ],
        "ffplay" => vec![
            "-loglevel".to_string(),
            "quiet".to_string(),
            "-loop".to_string(),
            "0".to_string(),
        ],
        "mplayer" => vec!["-really-quiet".to_string(), "-loop".to_string(), "0".to_string()],
        _ => Vec::new(),
    }
}

/// Searches for a binary in the system PATH.
///
/// Uses `which` on Unix systems and `where` on Windows.
fn find_in_path(binary_name: &str) -> Result<PathBuf> {
    let search_cmd = if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    };

    let output = Command::new(search_cmd)
        .arg(binary_name)
        .output()
        .map_err(|e| anyhow!("Failed to search PATH for {binary_name}: {e}"))?;

    if output.status.success() {
        let path_str = String::from_utf8_lossy(&output.stdout);
        let path = PathBuf::from(path_str.lines().next().unwrap_or("").trim());
        if !path.as_os_str().is_empty() {
            return Ok(path);
        }
    }

    Err(anyhow!("'{binary_name}' not found in PATH"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_without_media_file_is_a_noop() {
        let mut player = BackgroundPlayer::new(None, None, Vec::new());

        assert!(player.is_paused());
        player.play().unwrap();
        assert!(!player.is_paused());
        player.pause().unwrap();
        assert!(player.is_paused());
    }

    #[test]
    fn default_args_follow_player_binary() {
        let args = default_player_args(&PathBuf::from("/usr/bin/mpv"));
        assert!(args.contains(&"--loop-file=inf".to_string()));

        let args = default_player_args(&PathBuf::from("/usr/bin/ffplay"));
        assert!(args.contains(&"-loop".to_string()));

        let args = default_player_args(&PathBuf::from("/usr/bin/afplay"));
        assert!(args.is_empty());
    }
}
