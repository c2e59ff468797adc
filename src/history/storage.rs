//! Transcript history storage and retrieval using SQLite.
//!
//! Manages persistent storage of all transcripts with timestamps and the
//! path of the recording they came from.

use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// A single transcript entry in the history.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    /// Unique identifier for this transcript
    pub id: i64,
    /// The transcribed text content
    pub text: String,
    /// Path of the recording the transcript came from
    pub audio_path: Option<PathBuf>,
    /// When this transcript was created
    pub created_at: DateTime<Local>,
}

/// Manages the transcript history database.
pub struct HistoryManager {
    /// Path to the SQLite database file
    database_path: PathBuf,
    /// Connection to the database (lazy-loaded)
    connection: Option<Connection>,
}

impl HistoryManager {
    /// Creates a new history manager for the given data directory.
    ///
    /// # Errors
    /// - If the data directory cannot be created
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let database_path = data_dir.join("transcript_history.db");

        Ok(Self {
            database_path,
            connection: None,
        })
    }

    /// Initializes database connection and creates tables if necessary.
    ///
    /// # Errors
    /// - If the database file cannot be opened
    /// - If table creation fails
    fn get_connection(&mut self) -> Result<&Connection> {
        if self.connection.is_none() {
            let connection = Connection::open(&self.database_path)?;

            connection.execute(
                "CREATE TABLE IF NOT EXISTS transcripts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    text TEXT NOT NULL,
                    audio_path TEXT,
                    created_at TEXT NOT NULL
                )",
                [],
            )?;

            self.connection = Some(connection);
        }

        Ok(self.connection.as_ref().unwrap())
    }

    /// Saves a new transcript to the history database.
    ///
    /// # Errors
    /// - If database connection fails
    /// - If insertion fails
    pub fn save_transcript(&mut self, text: &str, audio_path: Option<&Path>) -> Result<()> {
        let connection = self.get_connection()?;
        let timestamp = Local::now().to_rfc3339();
        let audio = audio_path.map(|p| p.to_string_lossy().to_string());

        connection.execute(
            "INSERT INTO transcripts (text, audio_path, created_at) VALUES (?1, ?2, ?3)",
            params![text, audio, timestamp],
        )?;

        tracing::debug!("Transcript saved to history");
        Ok(())
    }

    /// Retrieves the most recent transcripts, newest first.
    ///
    /// # Errors
    /// - If database connection fails
    /// - If query execution fails
    /// - If timestamp parsing fails
    pub fn recent_transcripts(&mut self, limit: usize) -> Result<Vec<TranscriptEntry>> {
        let connection = self.get_connection()?;

        let mut statement = connection.prepare(
            "SELECT id, text, audio_path, created_at FROM transcripts
             ORDER BY created_at DESC LIMIT ?1",
        )?;

        let entries = statement
            .query_map(params![limit as i64], |row| {
                let id = row.get::<_, i64>(0)?;
                let text = row.get::<_, String>(1)?;
                let audio_path = row
                    .get::<_, Option<String>>(2)?
                    .map(PathBuf::from);
                let timestamp_str = row.get::<_, String>(3)?;

                let created_at = DateTime::parse_from_rfc3339(&timestamp_str)
                    .map(|dt| dt.with_timezone(&Local))
                    .map_err(|_| {
                        rusqlite::Error::InvalidParameterName(
                            "Invalid timestamp format".to_string(),
                        )
                    })?;

                Ok(TranscriptEntry {
                    id,
                    text,
                    audio_path,
                    created_at,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_data_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rectap-history-{tag}-{}", std::process::id()))
    }

    #[test]
    fn save_and_fetch_round_trip() {
        let dir = temp_data_dir("roundtrip");
        let mut manager = HistoryManager::new(&dir).unwrap();

        manager
            .save_transcript("open the calculator", Some(Path::new("/tmp/take1.wav")))
            .unwrap();
        manager.save_transcript("what is the weather", None).unwrap();

        let entries = manager.recent_transcripts(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.text == "open the calculator"));
        assert!(entries
            .iter()
            .any(|e| e.audio_path == Some(PathBuf::from("/tmp/take1.wav"))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn limit_caps_returned_entries() {
        let dir = temp_data_dir("limit");
        let mut manager = HistoryManager::new(&dir).unwrap();

        for i in 0..5 {
            manager.save_transcript(&format!("take {i}"), None).unwrap();
        }

        let entries = manager.recent_transcripts(3).unwrap();
        assert_eq!(entries.len(), 3);

        std::fs::remove_dir_all(&dir).ok();
    }
}
