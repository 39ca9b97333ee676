//! Relational-table memo backend on SQLite.
//!
//! # Responsibility
//! - Map `Memo` records to rows of the `memos` table and back.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Column names are the snake_case form of memo fields.
//! - `tags` is a JSON array in a TEXT column; NULL reads as an empty list.
//! - Unknown `category` values read as the default category.
//! - Insert/update return the row as re-read from the table.
//! - Timestamps are written in canonical UTC form, so text order in
//!   `ORDER BY` and the update guard is chronological order.

use crate::db::{open_db, open_db_in_memory};
use crate::model::category::Category;
use crate::model::memo::{Memo, MemoId};
use crate::repo::memo_repo::{MemoListQuery, MemoRepository, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::path::Path;
use uuid::Uuid;

const BACKEND_NAME: &str = "sqlite";

const MEMO_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category,
    tags,
    created_at,
    updated_at
FROM memos";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "category",
    "tags",
    "created_at",
    "updated_at",
];

/// SQLite-backed memo repository owning its connection.
pub struct SqliteMemoRepository {
    conn: Connection,
}

impl SqliteMemoRepository {
    /// Wraps a migrated connection after checking the `memos` schema.
    ///
    /// # Errors
    /// - `InvalidData` when the table or a required column is missing.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn memo_exists(&self, id: MemoId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM memos WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn read_back(&self, id: MemoId) -> RepoResult<Memo> {
        self.get_memo(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("memo {id} missing from read-back after write"))
        })
    }
}

impl MemoRepository for SqliteMemoRepository {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn list_memos(&self, query: &MemoListQuery) -> RepoResult<Vec<Memo>> {
        let mut sql = format!("{MEMO_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        if let Some(text) = query.normalized_text() {
            sql.push_str(" AND (title LIKE ? ESCAPE '\\' OR content LIKE ? ESCAPE '\\')");
            let pattern = format!("%{}%", escape_like(text));
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }

        Ok(memos)
    }

    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memo_row(row)?));
        }

        Ok(None)
    }

    fn insert_memo(&self, memo: &Memo) -> RepoResult<Memo> {
        let memo = &memo.canonicalized()?;

        let tags = serde_json::to_string(&memo.tags)?;
        let result = self.conn.execute(
            "INSERT INTO memos (
                id,
                title,
                content,
                category,
                tags,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                memo.id.to_string(),
                memo.title.as_str(),
                memo.content.as_str(),
                memo.category.as_str(),
                tags,
                memo.created_at.as_str(),
                memo.updated_at.as_str(),
            ],
        );

        match result {
            Ok(_) => self.read_back(memo.id),
            Err(err) if is_constraint_violation(&err) => Err(RepoError::Duplicate(memo.id)),
            Err(err) => Err(err.into()),
        }
    }

    fn update_memo(&self, memo: &Memo) -> RepoResult<Memo> {
        let memo = &memo.canonicalized()?;

        let tags = serde_json::to_string(&memo.tags)?;
        let changed = self.conn.execute(
            "UPDATE memos
             SET
                title = ?2,
                content = ?3,
                category = ?4,
                tags = ?5,
                updated_at = ?6
             WHERE id = ?1
               AND updated_at <= ?6;",
            params![
                memo.id.to_string(),
                memo.title.as_str(),
                memo.content.as_str(),
                memo.category.as_str(),
                tags,
                memo.updated_at.as_str(),
            ],
        )?;

        if changed == 0 {
            if self.memo_exists(memo.id)? {
                return Err(RepoError::StaleUpdate { id: memo.id });
            }
            return Err(RepoError::NotFound(memo.id));
        }

        self.read_back(memo.id)
    }

    fn delete_memo(&self, id: MemoId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM memos WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }

    fn clear_memos(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM memos;", [])?;
        Ok(())
    }

    fn count_memos(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM memos;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative memo count `{count}`")))
    }
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in memos.id")))?;

    let category = row
        .get::<_, Option<String>>("category")?
        .as_deref()
        .map(Category::from_storage)
        .unwrap_or_default();

    let tags = match row.get::<_, Option<String>>("tags")? {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str::<Option<Vec<String>>>(&raw)
                .map_err(|err| {
                    RepoError::InvalidData(format!("invalid tags json for memo {id}: {err}"))
                })?
                .unwrap_or_default()
        }
        _ => Vec::new(),
    };

    Ok(Memo {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        category,
        tags,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(memos);")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }

    if columns.is_empty() {
        return Err(RepoError::InvalidData(
            "required table `memos` is missing; open the connection through db::open_db"
                .to_string(),
        ));
    }

    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(RepoError::InvalidData(format!(
                "required column `memos.{required}` is missing"
            )));
        }
    }

    Ok(())
}
