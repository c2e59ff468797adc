//! Recording session toggle controller.
//!
//! Tracks whether a session is active, drives the background media player in
//! lockstep with that state, and announces every transition to the configured
//! notifier. State is updated optimistically: the flag and the media player
//! change before the notification completes, and a failed notification is
//! logged without rolling either back.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::media::MediaControl;
use super::notify::SessionNotifier;

/// Controls the recording session state and its side effects.
///
/// Owns the media handle for its lifetime; the handle is forced into a
/// paused state at construction regardless of what it was doing before.
pub struct SessionController<M, N> {
    /// Whether a recording session is believed to be active
    recording: bool,
    /// Background media, playing while a session is active
    media: M,
    /// Endpoint notified of start/stop transitions
    notifier: Arc<N>,
}

impl<M, N> SessionController<M, N>
where
    M: MediaControl,
    N: SessionNotifier,
{
    /// Creates a controller around a media handle and a notifier.
    ///
    /// The media handle is paused immediately. A pause failure is logged and
    /// otherwise ignored; this component never surfaces errors to its caller.
    pub fn new(mut media: M, notifier: Arc<N>) -> Self {
        if let Err(e) = media.pause() {
            tracing::warn!("Failed to pause media at startup: {e}");
        }

        Self {
            recording: false,
            media,
            notifier,
        }
    }

    /// Toggles the session: starts it when idle, stops it when active.
    ///
    /// Returns the handle of the spawned notification task so callers that
    /// care about completion (tests, shutdown) can await it. The session
    /// loop drops it; the task runs to completion either way.
    ///
    /// Responses from rapid toggles may complete out of order; outcomes are
    /// only logged, never fed back into the session state.
    pub fn toggle(&mut self) -> JoinHandle<()> {
        if self.recording {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Returns whether a recording session is currently believed active.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Start path: flip state, start media, announce asynchronously.
    fn start(&mut self) -> JoinHandle<()> {
        self.recording = true;
        tracing::info!("Session started");

        if let Err(e) = self.media.play() {
            tracing::warn!("Failed to start media playback: {e}");
        }

        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match notifier.notify_start().await {
                Ok(body) => tracing::info!("Start notification acknowledged: {body}"),
                Err(e) => tracing::error!("Start notification failed: {e}"),
            }
        })
    }

    /// Stop path: flip state, pause media, announce asynchronously.
    fn stop(&mut self) -> JoinHandle<()> {
        self.recording = false;
        tracing::info!("Session stopped");

        if let Err(e) = self.media.pause() {
            tracing::warn!("Failed to pause media playback: {e}");
        }

        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match notifier.notify_stop().await {
                Ok(body) => tracing::info!("Stop notification acknowledged: {body}"),
                Err(e) => tracing::error!("Stop notification failed: {e}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Media handle that records play/pause calls.
    struct FakeMedia {
        paused: bool,
        pause_calls: usize,
    }

    impl FakeMedia {
        fn playing() -> Self {
            Self {
                paused: false,
                pause_calls: 0,
            }
        }
    }

    impl MediaControl for FakeMedia {
        fn play(&mut self) -> anyhow::Result<()> {
            self.paused = false;
            Ok(())
        }

        fn pause(&mut self) -> anyhow::Result<()> {
            self.paused = true;
            self.pause_calls += 1;
            Ok(())
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    /// Notifier that counts calls and optionally fails the start path.
    #[derive(Default)]
    struct FakeNotifier {
        start_calls: AtomicUsize,
        stop_calls: AtomicUsize,
        fail_start: bool,
    }

    impl SessionNotifier for FakeNotifier {
        async fn notify_start(&self) -> anyhow::Result<String> {
            self.start_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_start {
                Err(anyhow!("connection refused"))
            } else {
                Ok("recording".to_string())
            }
        }

        async fn notify_stop(&self) -> anyhow::Result<String> {
            self.stop_calls.fetch_add(1, Ordering::SeqCst);
            Ok("stopped".to_string())
        }
    }

    fn controller(
        notifier: &Arc<FakeNotifier>,
    ) -> SessionController<FakeMedia, FakeNotifier> {
        SessionController::new(FakeMedia::playing(), Arc::clone(notifier))
    }

    #[tokio::test]
    async fn construction_pauses_media_that_was_playing() {
        let notifier = Arc::new(FakeNotifier::default());
        let controller = controller(&notifier);

        assert!(!controller.is_recording());
        assert!(controller.media.is_paused());
        assert_eq!(controller.media.pause_calls, 1);
    }

    #[tokio::test]
    async fn toggle_parity_after_repeated_invocations() {
        let notifier = Arc::new(FakeNotifier::default());
        let mut controller = controller(&notifier);

        for n in 1..=5 {
            controller.toggle().await.unwrap();
            assert_eq!(controller.is_recording(), n % 2 == 1);
        }
    }

    #[tokio::test]
    async fn toggle_from_idle_starts_media_and_notifies_start_once() {
        let notifier = Arc::new(FakeNotifier::default());
        let mut controller = controller(&notifier);

        controller.toggle().await.unwrap();

        assert!(controller.is_recording());
        assert!(!controller.media.is_paused());
        assert_eq!(notifier.start_calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.stop_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn toggle_from_active_pauses_media_and_notifies_stop_once() {
        let notifier = Arc::new(FakeNotifier::default());
        let mut controller = controller(&notifier);
        controller.toggle().await.unwrap();

        controller.toggle().await.unwrap();

        assert!(!controller.is_recording());
        assert!(controller.media.is_paused());
        assert_eq!(notifier.start_calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.stop_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_start_notification_does_not_roll_back() {
        let notifier = Arc::new(FakeNotifier {
            fail_start: true,
            ..FakeNotifier::default()
        });
        let mut controller = controller(&notifier);

        controller.toggle().await.unwrap();

        // State and playback keep their optimistic values.
        assert!(controller.is_recording());
        assert!(!controller.media.is_paused());
        assert_eq!(notifier.start_calls.load(Ordering::SeqCst), 1);
    }
}
