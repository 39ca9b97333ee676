//! Ordered schema scripts for the `memos` table.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one.
//! - All pending scripts run in one transaction; `user_version` is bumped
//!   after each script inside that transaction.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "memos",
        sql: include_str!("0001_memos.sql"),
    },
    Migration {
        version: 2,
        name: "category_index",
        sql: include_str!("0002_category_index.sql"),
    },
];

/// Schema version produced by running every known script.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Upgrades `conn` to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migration` naming the first script that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        debug!("event=db_migrate module=db status=ok version={from_version} pending=0");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        let script = format!(
            "{}\nPRAGMA user_version = {};",
            migration.sql, migration.version
        );
        tx.execute_batch(&script)
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={latest} applied={}",
        pending.len()
    );
    Ok(())
}
