//! Local session storage

use crate::error::{Error, Result};
use crate::models::AuthSession;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SESSION_KEY: &str = "session";
const REMEMBERED_EMAIL_KEY: &str = "remembered_email";

/// Where an issued session is kept between launches.
///
/// `save_session` returning `Ok` is the acknowledgement that the session is
/// durable; callers must not treat a login as complete before it.
pub trait SessionStore: Send + Sync {
    fn save_session(&self, session: &AuthSession) -> Result<()>;
    fn load_session(&self) -> Result<Option<AuthSession>>;
    fn clear_session(&self) -> Result<()>;

    fn remember_email(&self, email: &str) -> Result<()>;
    fn remembered_email(&self) -> Result<Option<String>>;
    fn forget_email(&self) -> Result<()>;
}

// ============================================================================
// SQLite
// ============================================================================

pub struct LocalStorage {
    conn: Mutex<Connection>,
}

impl LocalStorage {
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let conn = Connection::open(data_dir.join("energygrid.db"))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER DEFAULT (strftime('%s', 'now'))
            );
            "#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn save_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn delete_setting(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl SessionStore for LocalStorage {
    fn save_session(&self, session: &AuthSession) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.save_setting(SESSION_KEY, &json)
    }

    fn load_session(&self) -> Result<Option<AuthSession>> {
        match self.get_setting(SESSION_KEY)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    tracing::warn!("Discarding unreadable stored session: {}", e);
                    self.delete_setting(SESSION_KEY)?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn clear_session(&self) -> Result<()> {
        self.delete_setting(SESSION_KEY)
    }

    fn remember_email(&self, email: &str) -> Result<()> {
        self.save_setting(REMEMBERED_EMAIL_KEY, email)
    }

    fn remembered_email(&self) -> Result<Option<String>> {
        self.get_setting(REMEMBERED_EMAIL_KEY)
    }

    fn forget_email(&self) -> Result<()> {
        self.delete_setting(REMEMBERED_EMAIL_KEY)
    }
}

// ============================================================================
// Memory
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    session: Mutex<Option<AuthSession>>,
    email: Mutex<Option<String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            Err(Error::Storage("store is read-only".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SessionStore for MemoryStore {
    fn save_session(&self, session: &AuthSession) -> Result<()> {
        self.check_writable()?;
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    fn load_session(&self) -> Result<Option<AuthSession>> {
        Ok(self.session.lock().clone())
    }

    fn clear_session(&self) -> Result<()> {
        self.check_writable()?;
        *self.session.lock() = None;
        Ok(())
    }

    fn remember_email(&self, email: &str) -> Result<()> {
        self.check_writable()?;
        *self.email.lock() = Some(email.to_string());
        Ok(())
    }

    fn remembered_email(&self) -> Result<Option<String>> {
        Ok(self.email.lock().clone())
    }

    fn forget_email(&self) -> Result<()> {
        self.check_writable()?;
        *self.email.lock() = None;
        Ok(())
    }
}
