//! Memo repository contract shared by every storage backend.
//!
//! # Responsibility
//! - Define the fallible CRUD/search primitives a backend must provide.
//! - Define the repository error taxonomy.
//!
//! # Invariants
//! - Write paths persist `Memo::canonicalized()` copies, never raw input.
//! - Lists are ordered `created_at DESC, id ASC`.
//! - Deleting an absent id succeeds.
//! - An update carrying an `updated_at` older than the stored one is rejected
//!   with `StaleUpdate`.

use crate::db::DbError;
use crate::model::category::Category;
use crate::model::memo::{Memo, MemoId, MemoValidationError};
use crate::model::timestamp;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for memo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemoValidationError),
    Db(DbError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    NotFound(MemoId),
    Duplicate(MemoId),
    /// Incoming record is older than the stored one.
    StaleUpdate {
        id: MemoId,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "storage io failure: {err}"),
            Self::Serialization(err) => write!(f, "storage serialization failure: {err}"),
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::Duplicate(id) => write!(f, "memo already exists: {id}"),
            Self::StaleUpdate { id } => {
                write!(f, "stale update rejected for memo {id}: stored copy is newer")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::NotFound(_)
            | Self::Duplicate(_)
            | Self::StaleUpdate { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl RepoError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Db(_) => "db",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::NotFound(_) => "not_found",
            Self::Duplicate(_) => "duplicate",
            Self::StaleUpdate { .. } => "stale_update",
            Self::InvalidData(_) => "invalid_data",
        }
    }

    /// Error text for log fields. Validation failures are reduced to their
    /// kind because their values come from user input.
    pub fn log_detail(&self) -> String {
        match self {
            Self::Validation(err) => err.kind().to_string(),
            other => other.to_string(),
        }
    }
}

impl From<MemoValidationError> for RepoError {
    fn from(value: MemoValidationError) -> Self {
        Self::Validation(value)
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

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Backend-side filter options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoListQuery {
    /// Exact category match; `None` lists every category.
    pub category: Option<Category>,
    /// Case-insensitive substring over title or content. Blank means none.
    pub text: Option<String>,
}

impl MemoListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_category(category: Category) -> Self {
        Self {
            category: Some(category),
            text: None,
        }
    }

    pub fn by_text(text: impl Into<String>) -> Self {
        Self {
            category: None,
            text: Some(text.into()),
        }
    }

    /// Returns the trimmed search text, or `None` when blank.
    pub fn normalized_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// In-process evaluation used by backends without a query engine.
    pub fn matches(&self, memo: &Memo) -> bool {
        if let Some(category) = self.category {
            if memo.category != category {
                return false;
            }
        }
        match self.normalized_text() {
            Some(text) => {
                let needle = text.to_lowercase();
                memo.title.to_lowercase().contains(&needle)
                    || memo.content.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Storage backend contract.
///
/// Implementations are interchangeable; the active one is chosen once at
/// startup and reached through `Box<dyn MemoRepository>`.
pub trait MemoRepository {
    /// Short backend identifier for diagnostics (`sqlite`, `local`).
    fn backend_name(&self) -> &'static str;
    /// Lists memos newest first.
    fn list_memos(&self, query: &MemoListQuery) -> RepoResult<Vec<Memo>>;
    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>>;
    /// Inserts a memo carrying caller-assigned id/timestamps and returns the
    /// stored record.
    fn insert_memo(&self, memo: &Memo) -> RepoResult<Memo>;
    /// Replaces every mutable field of the memo with the same id.
    fn update_memo(&self, memo: &Memo) -> RepoResult<Memo>;
    fn delete_memo(&self, id: MemoId) -> RepoResult<()>;
    /// Removes every memo.
    fn clear_memos(&self) -> RepoResult<()>;
    fn count_memos(&self) -> RepoResult<usize>;
}

impl<R: MemoRepository + ?Sized> MemoRepository for Box<R> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn list_memos(&self, query: &MemoListQuery) -> RepoResult<Vec<Memo>> {
        (**self).list_memos(query)
    }

    fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        (**self).get_memo(id)
    }

    fn insert_memo(&self, memo: &Memo) -> RepoResult<Memo> {
        (**self).insert_memo(memo)
    }

    fn update_memo(&self, memo: &Memo) -> RepoResult<Memo> {
        (**self).update_memo(memo)
    }

    fn delete_memo(&self, id: MemoId) -> RepoResult<()> {
        (**self).delete_memo(id)
    }

    fn clear_memos(&self) -> RepoResult<()> {
        (**self).clear_memos()
    }

    fn count_memos(&self) -> RepoResult<usize> {
        (**self).count_memos()
    }
}

/// Canonical list order: `created_at DESC, id ASC`, compared as instants.
pub fn newest_first(left: &Memo, right: &Memo) -> Ordering {
    let by_created = match (
        timestamp::parse(&left.created_at),
        timestamp::parse(&right.created_at),
    ) {
        (Some(left_at), Some(right_at)) => right_at.cmp(&left_at),
        _ => right.created_at.cmp(&left.created_at),
    };
    by_created.then_with(|| left.id.cmp(&right.id))
}

#[cfg(test)]
mod tests {
    use super::{newest_first, RepoError};
    use crate::model::category::Category;
    use crate::model::memo::{Memo, MemoFormData, MemoValidationError};
    use std::cmp::Ordering;
    use uuid::Uuid;

    #[test]
    fn log_detail_hides_validation_values() {
        let err = RepoError::Validation(MemoValidationError::DuplicateTag("diary".to_string()));
        assert_eq!(err.log_detail(), "duplicate_tag");
        assert!(!err.log_detail().contains("diary"));

        let id = Uuid::new_v4();
        assert!(RepoError::NotFound(id).log_detail().contains(&id.to_string()));
    }

    #[test]
    fn newest_first_compares_instants_across_offsets() {
        let data = MemoFormData::new("t", "c", Category::Work);
        let eastern = Memo::with_id(
            Uuid::new_v4(),
            data.clone(),
            "2025-01-01T08:00:00+09:00".to_string(),
        );
        let utc = Memo::with_id(Uuid::new_v4(), data, "2025-01-01T00:00:00.000Z".to_string());
        assert_eq!(newest_first(&utc, &eastern), Ordering::Less);
    }
}
