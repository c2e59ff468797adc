//! Transcription service for audio-to-text conversion.
//!
//! Recordings are transcribed through AssemblyAI's asynchronous API using an
//! upload, submit and poll flow. The API key comes from the credentials
//! store; transcript options come from the `[transcription]` config section.

pub mod assemblyai;

pub use assemblyai::transcribe;
