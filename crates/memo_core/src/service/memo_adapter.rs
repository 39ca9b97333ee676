//! Persistence adapter: the never-failing memo storage boundary.
//!
//! # Responsibility
//! - Expose list/create/update/delete/clear (plus search, category filter
//!   and lookup) over any `MemoRepository`.
//! - Log every backend failure and convert it to a failure marker: an
//!   empty list, `None` or `false`.
//!
//! # Invariants
//! - No method returns an error or panics on backend failure.
//! - Log events carry ids and error codes, never memo titles or bodies.

use crate::model::category::CategoryFilter;
use crate::model::memo::{Memo, MemoId};
use crate::repo::memo_repo::{MemoListQuery, MemoRepository, RepoError};
use log::{debug, error, info};

/// Adapter over one storage backend.
pub struct MemoAdapter<R: MemoRepository> {
    repo: R,
}

impl<R: MemoRepository> MemoAdapter<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the wrapped backend.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    pub fn backend_name(&self) -> &'static str {
        self.repo.backend_name()
    }

    /// Lists every memo, newest `created_at` first. Empty on failure.
    pub fn list(&self) -> Vec<Memo> {
        self.list_with("list", &MemoListQuery::all())
    }

    /// Backend-side title/content search. Empty on failure.
    pub fn search(&self, query: &str) -> Vec<Memo> {
        self.list_with("search", &MemoListQuery::by_text(query))
    }

    /// Backend-side category filter; `All` lists everything.
    pub fn list_by_category(&self, filter: CategoryFilter) -> Vec<Memo> {
        let query = match filter {
            CategoryFilter::All => MemoListQuery::all(),
            CategoryFilter::Only(category) => MemoListQuery::by_category(category),
        };
        self.list_with("list_by_category", &query)
    }

    pub fn get(&self, id: MemoId) -> Option<Memo> {
        match self.repo.get_memo(id) {
            Ok(found) => found,
            Err(err) => {
                self.report("get", Some(id), &err);
                None
            }
        }
    }

    /// Persists a memo that already carries its id and timestamps.
    pub fn create(&self, memo: &Memo) -> Option<Memo> {
        match self.repo.insert_memo(memo) {
            Ok(saved) => {
                info!(
                    "event=memo_create module=adapter status=ok backend={} memo_id={}",
                    self.backend_name(),
                    saved.id
                );
                Some(saved)
            }
            Err(err) => {
                self.report("create", Some(memo.id), &err);
                None
            }
        }
    }

    /// Replaces all mutable fields of the memo identified by `memo.id`.
    pub fn update(&self, memo: &Memo) -> Option<Memo> {
        match self.repo.update_memo(memo) {
            Ok(saved) => {
                info!(
                    "event=memo_update module=adapter status=ok backend={} memo_id={}",
                    self.backend_name(),
                    saved.id
                );
                Some(saved)
            }
            Err(err) => {
                self.report("update", Some(memo.id), &err);
                None
            }
        }
    }

    pub fn delete(&self, id: MemoId) -> bool {
        match self.repo.delete_memo(id) {
            Ok(()) => {
                info!(
                    "event=memo_delete module=adapter status=ok backend={} memo_id={id}",
                    self.backend_name()
                );
                true
            }
            Err(err) => {
                self.report("delete", Some(id), &err);
                false
            }
        }
    }

    /// Removes every memo. Intended for reset/test paths.
    pub fn clear(&self) -> bool {
        match self.repo.clear_memos() {
            Ok(()) => {
                info!(
                    "event=memo_clear module=adapter status=ok backend={}",
                    self.backend_name()
                );
                true
            }
            Err(err) => {
                self.report("clear", None, &err);
                false
            }
        }
    }

    /// Number of stored memos, or `None` when the backend is unreachable.
    pub fn count(&self) -> Option<usize> {
        match self.repo.count_memos() {
            Ok(count) => Some(count),
            Err(err) => {
                self.report("count", None, &err);
                None
            }
        }
    }

    fn list_with(&self, operation: &'static str, query: &MemoListQuery) -> Vec<Memo> {
        match self.repo.list_memos(query) {
            Ok(memos) => {
                debug!(
                    "event=memo_{operation} module=adapter status=ok backend={} count={}",
                    self.backend_name(),
                    memos.len()
                );
                memos
            }
            Err(err) => {
                self.report(operation, None, &err);
                Vec::new()
            }
        }
    }

    fn report(&self, operation: &'static str, id: Option<MemoId>, err: &RepoError) {
        let memo_id = id.map(|value| value.to_string()).unwrap_or_else(|| "-".to_string());
        error!(
            "event=memo_{operation} module=adapter status=error backend={} memo_id={memo_id} error_code={} error={}",
            self.backend_name(),
            err.code(),
            err.log_detail()
        );
    }
}
