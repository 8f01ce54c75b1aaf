use crate::models::{
    CharMismatch, CommonError, PracticeText, SessionId, SessionResult, SessionSummary, TextId,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use std::path::Path;
use tracing::{debug, warn};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS texts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        prompt TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text_id INTEGER NOT NULL,
        wpm REAL NOT NULL,
        accuracy REAL NOT NULL,
        errors INTEGER NOT NULL,
        completed_at TEXT NOT NULL,
        FOREIGN KEY (text_id) REFERENCES texts(id)
    );

    CREATE TABLE IF NOT EXISTS typing_errors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL,
        expected_char TEXT NOT NULL,
        typed_char TEXT NOT NULL,
        position INTEGER NOT NULL,
        FOREIGN KEY (session_id) REFERENCES sessions(id)
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
    CREATE INDEX IF NOT EXISTS idx_typing_errors_pair ON typing_errors(expected_char, typed_char);
"#;

/// SQLite persistence for texts, sessions, and their mismatch ledgers
#[derive(Debug)]
pub struct PracticeStore {
    conn: Connection,
}

impl PracticeStore {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn save_text(&self, content: &str, prompt: &str) -> Result<TextId> {
        self.conn.execute(
            "INSERT INTO texts (content, prompt, created_at) VALUES (?1, ?2, ?3)",
            params![content, prompt, now_timestamp()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_text(&self, id: TextId) -> Result<Option<PracticeText>> {
        self.conn
            .query_row(
                "SELECT id, content, prompt, created_at FROM texts WHERE id = ?1",
                [id],
                |row| {
                    Ok(PracticeText {
                        id: row.get(0)?,
                        content: row.get(1)?,
                        source_prompt: row.get(2)?,
                        created_at: timestamp_column(row, 3)?,
                    })
                },
            )
            .optional()
    }

    pub fn save_session(
        &self,
        text_id: TextId,
        wpm: f64,
        accuracy: f64,
        errors: usize,
    ) -> Result<SessionId> {
        self.conn.execute(
            "INSERT INTO sessions (text_id, wpm, accuracy, errors, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![text_id, wpm, accuracy, errors as i64, now_timestamp()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn save_mismatch(&self, session_id: SessionId, mismatch: &CharMismatch) -> Result<()> {
        self.conn.execute(
            "INSERT INTO typing_errors (session_id, expected_char, typed_char, position)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session_id,
                mismatch.expected_char.to_string(),
                mismatch.typed_char.to_string(),
                mismatch.position as i64,
            ],
        )?;
        Ok(())
    }

    /// Store each mismatch on its own; failures are logged and skipped.
    ///
    /// Returns how many entries were stored.
    pub fn save_mismatches(&self, session_id: SessionId, mismatches: &[CharMismatch]) -> usize {
        mismatches
            .iter()
            .filter(|mismatch| match self.save_mismatch(session_id, mismatch) {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        "Failed to save typing error at position {} for session {}: {}",
                        mismatch.position, session_id, e
                    );
                    false
                }
            })
            .count()
    }

    /// Persist a finalized session together with its mismatch ledger
    pub fn save_result(&self, result: &SessionResult) -> Result<SessionId> {
        let session_id =
            self.save_session(result.text_id, result.wpm, result.accuracy, result.error_count)?;
        let saved = self.save_mismatches(session_id, &result.mismatches);
        debug!(
            "saved session {} with {}/{} mismatches",
            session_id,
            saved,
            result.mismatches.len()
        );
        Ok(session_id)
    }

    /// Most recent sessions first, joined with their text prompt
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT s.id, s.text_id, s.wpm, s.accuracy, s.errors, s.completed_at, t.prompt
            FROM sessions s
            JOIN texts t ON s.text_id = t.id
            ORDER BY s.completed_at DESC, s.id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            Ok(SessionSummary {
                id: row.get(0)?,
                text_id: row.get(1)?,
                wpm: row.get(2)?,
                accuracy: row.get(3)?,
                errors: row.get::<_, i64>(4)? as usize,
                completed_at: timestamp_column(row, 5)?,
                prompt: row.get(6)?,
            })
        })?;

        let sessions = rows.collect::<Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Most frequent expected/typed pairs across all sessions
    pub fn common_errors(&self, limit: usize) -> Result<Vec<CommonError>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT expected_char, typed_char, COUNT(*) AS count
            FROM typing_errors
            GROUP BY expected_char, typed_char
            ORDER BY count DESC, expected_char, typed_char
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            Ok(CommonError {
                expected_char: char_column(row, 0)?,
                typed_char: char_column(row, 1)?,
                count: row.get::<_, i64>(2)? as usize,
            })
        })?;

        let errors = rows.collect::<Result<Vec<_>>>()?;
        Ok(errors)
    }
}

// Fixed precision keeps the text column sortable
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn timestamp_column(row: &Row, idx: usize) -> Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn char_column(row: &Row, idx: usize) -> Result<char> {
    let raw: String = row.get(idx)?;
    Ok(raw.chars().next().unwrap_or('\0'))
}
