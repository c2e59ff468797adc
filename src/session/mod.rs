//! Recording session feature for rectap.
//!
//! Provides the toggle controller that tracks the session state, the
//! background media player driven in lockstep with it, and the HTTP
//! notifier that announces state transitions to a companion endpoint.

pub mod controller;
pub mod media;
pub mod notify;

pub use controller::SessionController;
pub use media::{BackgroundPlayer, MediaControl};
pub use notify::{HttpNotifier, Notifier, SessionNotifier};
