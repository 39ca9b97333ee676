//! Local key/value memo backend.
//!
//! # Responsibility
//! - Persist the memo collection under one namespaced key of a JSON
//!   document file, mirroring browser local storage.
//! - Evaluate list filters in process.
//!
//! # Invariants
//! - The value under the key is a camelCase JSON array of memos, stored as
//!   an encoded string like local storage values. A raw array is accepted
//!   on read.
//! - A missing file, key or `null` value is an empty collection.
//! - Keys other than the memo key are preserved on every write.
//! - Writes replace the whole document through a temp file + rename.
//! - Written timestamps are canonical UTC text.

use crate::model::memo::{Memo, MemoId};
use crate::model::timestamp;
use crate::repo::memo_repo::{
    newest_first, MemoListQuery, MemoRepository, RepoError, RepoResult,
};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const BACKEND_NAME: &str = "local";

/// Default namespaced key holding the memo collection.
pub const DEFAULT_STORAGE_KEY: &str = "memo-app-memos";

/// JSON-document repository emulating browser local storage.
#[derive(Debug, Clone)]
pub struct LocalMemoRepository {
    path: PathBuf,
    key: String,
}

impl LocalMemoRepository {
    /// Uses `path` as the document file and the default storage key.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_document(&self) -> RepoResult<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(RepoError::InvalidData(format!(
                "local storage document `{}` is not a JSON object",
                self.path.display()
            ))),
        }
    }

    fn load(&self) -> RepoResult<(Map<String, Value>, Vec<Memo>)> {
        let document = self.read_document()?;
        let memos = match document.get(&self.key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(encoded)) if encoded.trim().is_empty() => Vec::new(),
            Some(Value::String(encoded)) => {
                serde_json::from_str::<Option<Vec<Memo>>>(encoded)?.unwrap_or_default()
            }
            Some(value @ Value::Array(_)) => serde_json::from_value(value.clone())?,
            Some(_) => {
                return Err(RepoError::InvalidData(format!(
                    "local storage key `{}` does not hold a memo array",
                    self.key
                )));
            }
        };
        Ok((document, memos))
    }

    fn store(&self, mut document: Map<String, Value>, memos: &[Memo]) -> RepoResult<()> {
        let encoded = serde_json::to_string(memos)?;
        document.insert(self.key.clone(), Value::String(encoded));
        let body = serde_json::to_string_pretty(&Value::Object(document))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        fs::write(&temp_path, body)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl MemoRepository for LocalMemoRepository {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn list_memos(&self, query: &MemoListQuery) -> RepoResult<Vec<Memo>> {
        let (_, memos) = self.load()?;
        let mut listed: Vec<Memo> = memos.into_iter().filter(|memo| query.matches(memo)).collect();
        listed.sort_by(newest_first);
        Ok(listed)
    }

    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        let (_, memos) = self.load()?;
        Ok(memos.into_iter().find(|memo| memo.id == id))
    }

    fn insert_memo(&self, memo: &Memo) -> RepoResult<Memo> {
        let memo = &memo.canonicalized()?;

        let (document, mut memos) = self.load()?;
        if memos.iter().any(|existing| existing.id == memo.id) {
            return Err(RepoError::Duplicate(memo.id));
        }
        memos.insert(0, memo.clone());
        self.store(document, &memos)?;
        Ok(memo.clone())
    }

    fn update_memo(&self, memo: &Memo) -> RepoResult<Memo> {
        let memo = &memo.canonicalized()?;

        let (document, mut memos) = self.load()?;
        let slot = memos
            .iter_mut()
            .find(|existing| existing.id == memo.id)
            .ok_or(RepoError::NotFound(memo.id))?;
        if is_older(&memo.updated_at, &slot.updated_at) {
            return Err(RepoError::StaleUpdate { id: memo.id });
        }

        // created_at is immutable; keep the stored value.
        slot.title = memo.title.clone();
        slot.content = memo.content.clone();
        slot.category = memo.category;
        slot.tags = memo.tags.clone();
        slot.updated_at = memo.updated_at.clone();
        let updated = slot.clone();

        self.store(document, &memos)?;
        Ok(updated)
    }

    fn delete_memo(&self, id: MemoId) -> RepoResult<()> {
        let (document, mut memos) = self.load()?;
        let before = memos.len();
        memos.retain(|memo| memo.id != id);
        if memos.len() != before {
            self.store(document, &memos)?;
        }
        Ok(())
    }

    fn clear_memos(&self) -> RepoResult<()> {
        let (document, _) = self.load()?;
        self.store(document, &[])
    }

    fn count_memos(&self) -> RepoResult<usize> {
        Ok(self.load()?.1.len())
    }
}

/// Compares as instants; stored text may predate canonical timestamps.
fn is_older(incoming: &str, stored: &str) -> bool {
    match (timestamp::parse(incoming), timestamp::parse(stored)) {
        (Some(incoming), Some(stored)) => incoming < stored,
        _ => incoming < stored,
    }
}
