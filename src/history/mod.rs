//! Transcript history feature for rectap.

pub mod storage;

pub use storage::{HistoryManager, TranscriptEntry};
