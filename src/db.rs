// SQLite persistence layer for accepted speaker registrations.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::registration::speaker::{
    BrowserInfo, BrowserName, Session, Speaker, SpeakerId,
};

/// Storage collaborator for accepted registrations. The evaluator calls this
/// exactly once per accepted speaker and treats it as an opaque, blocking
/// operation.
pub trait SpeakerStore {
    fn save_speaker(&self, speaker: &Speaker) -> Result<SpeakerId, StoreError>;
}

/// Failure while saving a speaker. Opaque to the decision pipeline; the
/// underlying cause is preserved for logging.
#[derive(Debug, Error)]
#[error("speaker store failure: {0}")]
pub struct StoreError(#[from] anyhow::Error);

/// SQLite-backed store for speakers and their proposed sessions.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS speakers (
                id                    INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name            TEXT NOT NULL,
                last_name             TEXT NOT NULL,
                email                 TEXT NOT NULL,
                experience_years      INTEGER,
                has_blog              INTEGER NOT NULL,
                blog_url              TEXT,
                browser               TEXT NOT NULL,
                browser_major_version INTEGER NOT NULL,
                certifications        TEXT NOT NULL,
                employer              TEXT,
                registration_fee      INTEGER NOT NULL,
                registered_at         TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                speaker_id  INTEGER NOT NULL REFERENCES speakers(id),
                title       TEXT NOT NULL,
                description TEXT NOT NULL,
                approved    INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_speaker_id
                ON sessions(speaker_id);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Insert a speaker and all of its sessions in one transaction, returning
    /// the new speaker rowid.
    fn insert_speaker(&self, speaker: &Speaker) -> Result<SpeakerId> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin speaker transaction")?;

        let certifications_json = serde_json::to_string(&speaker.certifications)
            .context("failed to serialize certifications")?;

        tx.execute(
            "INSERT INTO speakers
                (first_name, last_name, email, experience_years, has_blog,
                 blog_url, browser, browser_major_version, certifications,
                 employer, registration_fee, registered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                speaker.first_name,
                speaker.last_name,
                speaker.email,
                speaker.experience_years,
                speaker.has_blog,
                speaker.blog_url,
                speaker.browser.name.display_str(),
                speaker.browser.major_version,
                certifications_json,
                speaker.employer,
                speaker.registration_fee,
                Utc::now().to_rfc3339(),
            ],
        )
        .context("failed to insert speaker")?;

        let speaker_id = tx.last_insert_rowid();

        for session in &speaker.sessions {
            tx.execute(
                "INSERT INTO sessions (speaker_id, title, description, approved)
                 VALUES (?1, ?2, ?3, ?4)",
                params![speaker_id, session.title, session.description, session.approved],
            )
            .context("failed to insert session")?;
        }

        tx.commit().context("failed to commit speaker transaction")?;

        Ok(SpeakerId(speaker_id))
    }

    /// Load a previously saved speaker (with sessions) by id. Returns `None`
    /// if no such row exists.
    pub fn load_speaker(&self, id: SpeakerId) -> Result<Option<Speaker>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT first_name, last_name, email, experience_years, has_blog,
                        blog_url, browser, browser_major_version, certifications,
                        employer, registration_fee
                 FROM speakers WHERE id = ?1",
            )
            .context("failed to prepare load_speaker query")?;

        let mut rows = stmt
            .query_map(params![id.0], |row| {
                let browser_name: String = row.get(6)?;
                let certifications_json: String = row.get(8)?;
                let certifications = serde_json::from_str::<Vec<String>>(&certifications_json)
                    .unwrap_or_default();
                Ok(Speaker {
                    first_name: row.get(0)?,
                    last_name: row.get(1)?,
                    email: row.get(2)?,
                    experience_years: row.get(3)?,
                    has_blog: row.get(4)?,
                    blog_url: row.get(5)?,
                    browser: BrowserInfo {
                        name: BrowserName::from_str_name(&browser_name),
                        major_version: row.get(7)?,
                    },
                    certifications,
                    employer: row.get(9)?,
                    registration_fee: row.get(10)?,
                    sessions: Vec::new(),
                })
            })
            .context("failed to query speaker")?;

        let mut speaker = match rows.next() {
            Some(row_result) => row_result.context("failed to read speaker row")?,
            None => return Ok(None),
        };

        let mut session_stmt = conn
            .prepare(
                "SELECT title, description, approved
                 FROM sessions WHERE speaker_id = ?1 ORDER BY id",
            )
            .context("failed to prepare session query")?;

        speaker.sessions = session_stmt
            .query_map(params![id.0], |row| {
                Ok(Session {
                    title: row.get(0)?,
                    description: row.get(1)?,
                    approved: row.get(2)?,
                })
            })
            .context("failed to query sessions")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map session rows")?;

        Ok(Some(speaker))
    }
}

impl SpeakerStore for SqliteStore {
    fn save_speaker(&self, speaker: &Speaker) -> Result<SpeakerId, StoreError> {
        self.insert_speaker(speaker).map_err(StoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved_speaker() -> Speaker {
        Speaker {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@analytical.engine".into(),
            experience_years: Some(7),
            has_blog: true,
            blog_url: Some("https://ada.example".into()),
            browser: BrowserInfo {
                name: BrowserName::Firefox,
                major_version: 121,
            },
            certifications: vec!["Difference Engine Operator".into()],
            employer: Some("Analytical Society".into()),
            registration_fee: 50,
            sessions: vec![
                Session {
                    title: "Notes on the Engine".into(),
                    description: "Programs as data".into(),
                    approved: true,
                },
                Session {
                    title: "Punch Cards revisited".into(),
                    description: "A historical tour".into(),
                    approved: false,
                },
            ],
        }
    }

    #[test]
    fn save_and_reload_round_trip() {
        let store = SqliteStore::open(":memory:").expect("open in-memory db");
        let speaker = saved_speaker();

        let id = store.save_speaker(&speaker).expect("save should succeed");
        let loaded = store
            .load_speaker(id)
            .expect("load should succeed")
            .expect("speaker should exist");

        assert_eq!(loaded.first_name, "Ada");
        assert_eq!(loaded.email, "ada@analytical.engine");
        assert_eq!(loaded.experience_years, Some(7));
        assert_eq!(loaded.browser.name, BrowserName::Firefox);
        assert_eq!(loaded.browser.major_version, 121);
        assert_eq!(loaded.certifications, vec!["Difference Engine Operator"]);
        assert_eq!(loaded.registration_fee, 50);
        assert_eq!(loaded.sessions.len(), 2);
        assert!(loaded.sessions[0].approved);
        assert!(!loaded.sessions[1].approved);
    }

    #[test]
    fn sequential_saves_return_distinct_increasing_ids() {
        let store = SqliteStore::open(":memory:").expect("open in-memory db");
        let speaker = saved_speaker();

        let first = store.save_speaker(&speaker).expect("first save");
        let second = store.save_speaker(&speaker).expect("second save");

        assert!(second.0 > first.0);
    }

    #[test]
    fn loading_an_unknown_id_returns_none() {
        let store = SqliteStore::open(":memory:").expect("open in-memory db");
        let missing = store.load_speaker(SpeakerId(42)).expect("query should succeed");
        assert!(missing.is_none());
    }
}
