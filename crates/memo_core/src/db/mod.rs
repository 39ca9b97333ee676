//! SQLite bootstrap for the relational memo backend.
//!
//! # Responsibility
//! - Open memo database files (creating parent directories) or in-memory
//!   databases with connection pragmas applied.
//! - Bring the `memos` schema up to date before any row access.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A database written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Parent directory of the database file could not be created.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// One migration script failed; the whole batch was rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Stable code used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite",
            Self::CreateDir { .. } => "db_create_dir",
            Self::Migration { .. } => "db_migration_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::CreateDir { path, source } => {
                write!(f, "cannot create database directory {}: {source}", path.display())
            }
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "memo migration {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "memo database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
