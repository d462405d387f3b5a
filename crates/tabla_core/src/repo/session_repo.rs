//! Persisted session repository.
//!
//! # Responsibility
//! - Keep the signed-in session across client restarts.
//!
//! # Invariants
//! - At most one session row exists (`id = 1`).
//! - `save` replaces any previous session atomically.

use crate::db::DbError;
use crate::model::session::Session;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A stored row violates a record invariant.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted session data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage of the single signed-in session.
pub trait SessionRepository {
    fn save(&self, session: &Session) -> RepoResult<()>;
    fn load(&self) -> RepoResult<Option<Session>>;
    /// Removes the stored session; clearing an empty store is a no-op.
    fn clear(&self) -> RepoResult<()>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn save(&self, session: &Session) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO session (id, username, token, saved_at)
             VALUES (1, ?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                token = excluded.token,
                saved_at = excluded.saved_at;",
            params![session.username, session.token],
        )?;
        info!("event=session_save module=repo status=ok");
        Ok(())
    }

    fn load(&self) -> RepoResult<Option<Session>> {
        let row = self
            .conn
            .query_row(
                "SELECT username, token FROM session WHERE id = 1;",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((_, token)) if token.trim().is_empty() => Err(RepoError::InvalidData(
                "stored session has an empty token".to_string(),
            )),
            Some((username, token)) => Ok(Some(Session::new(username, token))),
        }
    }

    fn clear(&self) -> RepoResult<()> {
        let removed = self.conn.execute("DELETE FROM session;", [])?;
        info!("event=session_clear module=repo status=ok removed={removed}");
        Ok(())
    }
}
