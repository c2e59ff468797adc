//! Microphone capture feature for rectap.
//!
//! Captures PCM audio from an input device while a session is active and
//! writes it out as mono 16-bit WAV when the session stops.

pub mod audio;

pub use audio::AudioCapture;
