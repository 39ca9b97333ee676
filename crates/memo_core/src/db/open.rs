use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens or creates the memo database at `path`, creating missing parent
/// directories, and migrates it to the latest schema.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    timed("file", || {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        prepare(Connection::open(path)?)
    })
}

/// Opens a private in-memory database with the memo schema applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    timed("memory", || prepare(Connection::open_in_memory()?))
}

fn timed<F>(mode: &'static str, open: F) -> DbResult<Connection>
where
    F: FnOnce() -> DbResult<Connection>,
{
    let started_at = Instant::now();
    let result = open();
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
    }
    result
}

fn prepare(mut conn: Connection) -> DbResult<Connection> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}
