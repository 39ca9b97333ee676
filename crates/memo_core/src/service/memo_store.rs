//! In-memory memo state store.
//!
//! # Responsibility
//! - Own the session's memo collection, search query and category filter.
//! - Delegate mutations to the persistence adapter and reconcile the
//!   in-memory collection only after the backend confirms.
//! - Derive the filtered view and statistics on demand.
//!
//! # Invariants
//! - The collection stays newest-first; created memos are prepended and
//!   updated memos keep their position.
//! - A failed backend call leaves the collection untouched.
//! - Derived views never mutate the stored collection.
//! - Only this type writes the collection.

use crate::model::category::{Category, CategoryFilter};
use crate::model::memo::{Memo, MemoFormData, MemoId};
use crate::repo::memo_repo::MemoRepository;
use crate::service::memo_adapter::MemoAdapter;
use crate::service::sample_data::SampleSeeder;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::time::Instant;

/// Counts derived from the collection and the current filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub total: usize,
    /// Only categories with at least one memo appear.
    pub by_category: BTreeMap<Category, usize>,
    /// Size of the currently filtered view.
    pub filtered: usize,
}

/// Session state store over one persistence adapter.
pub struct MemoStore<R: MemoRepository> {
    adapter: MemoAdapter<R>,
    memos: Vec<Memo>,
    search_query: String,
    selected_category: CategoryFilter,
    loading: bool,
    initialized: bool,
}

impl<R: MemoRepository> MemoStore<R> {
    /// Creates an empty store. Call [`MemoStore::initialize`] before use.
    ///
    /// `is_loading()` reports `true` until initialization completes.
    pub fn new(adapter: MemoAdapter<R>) -> Self {
        Self {
            adapter,
            memos: Vec::new(),
            search_query: String::new(),
            selected_category: CategoryFilter::All,
            loading: true,
            initialized: false,
        }
    }

    /// Seeds sample data when the backend is empty, then loads every memo.
    ///
    /// Runs once; later calls return the current collection size without
    /// touching the backend.
    pub fn initialize<S: SampleSeeder>(&mut self, seeder: &S) -> usize {
        if self.initialized {
            return self.memos.len();
        }

        let started_at = Instant::now();
        self.loading = true;
        let seeded = seeder.seed(&self.adapter);
        self.memos = self.adapter.list();
        self.loading = false;
        self.initialized = true;

        info!(
            "event=store_init module=store status=ok backend={} seeded={seeded} loaded={} duration_ms={}",
            self.adapter.backend_name(),
            self.memos.len(),
            started_at.elapsed().as_millis()
        );
        self.memos.len()
    }

    /// Ends the store lifecycle and hands back the adapter.
    pub fn teardown(self) -> MemoAdapter<R> {
        info!(
            "event=store_teardown module=store status=ok backend={} memos={}",
            self.adapter.backend_name(),
            self.memos.len()
        );
        self.adapter
    }

    /// Replaces the collection with a fresh backend listing.
    pub fn reload(&mut self) -> usize {
        self.memos = self.adapter.list();
        self.memos.len()
    }

    /// Creates a memo from form data.
    ///
    /// Assigns a new id and equal `created_at`/`updated_at`. Returns the
    /// persisted record, or `None` when the backend rejected it.
    pub fn create_memo(&mut self, data: MemoFormData) -> Option<Memo> {
        let memo = Memo::create(data);
        let saved = self.adapter.create(&memo)?;
        self.memos.insert(0, saved.clone());
        Some(saved)
    }

    /// Merges `data` over the memo with `id` and persists it.
    ///
    /// Returns `false` without a backend call when `id` is not loaded.
    pub fn update_memo(&mut self, id: MemoId, data: MemoFormData) -> bool {
        let Some(position) = self.memos.iter().position(|memo| memo.id == id) else {
            debug!("event=store_update module=store status=skipped reason=not_found memo_id={id}");
            return false;
        };

        let edited = self.memos[position].edited(data);
        match self.adapter.update(&edited) {
            Some(saved) => {
                self.memos[position] = saved;
                true
            }
            None => false,
        }
    }

    pub fn delete_memo(&mut self, id: MemoId) -> bool {
        if !self.adapter.delete(id) {
            return false;
        }
        self.memos.retain(|memo| memo.id != id);
        true
    }

    /// Deletes every memo and resets the search query and category filter.
    pub fn clear_all_memos(&mut self) -> bool {
        if !self.adapter.clear() {
            warn!("event=store_clear module=store status=error");
            return false;
        }
        self.memos.clear();
        self.search_query.clear();
        self.selected_category = CategoryFilter::All;
        true
    }

    /// Sets the free-text query. No backend call.
    pub fn search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Sets the category filter. No backend call.
    pub fn filter_by_category(&mut self, filter: impl Into<CategoryFilter>) {
        self.selected_category = filter.into();
    }

    pub fn get_memo_by_id(&self, id: MemoId) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    /// Category filter first, then case-insensitive query over title,
    /// content and tags when the query is not blank.
    pub fn filtered_memos(&self) -> Vec<&Memo> {
        let query = self.search_query.trim();
        let needle = (!query.is_empty()).then(|| query.to_lowercase());

        self.memos
            .iter()
            .filter(|memo| self.selected_category.matches(memo.category))
            .filter(|memo| match needle.as_deref() {
                Some(needle) => memo.matches_query(needle),
                None => true,
            })
            .collect()
    }

    pub fn stats(&self) -> MemoStats {
        let mut by_category = BTreeMap::new();
        for memo in &self.memos {
            *by_category.entry(memo.category).or_insert(0) += 1;
        }

        MemoStats {
            total: self.memos.len(),
            by_category,
            filtered: self.filtered_memos().len(),
        }
    }

    /// Unfiltered collection, newest first.
    pub fn all_memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_category(&self) -> CategoryFilter {
        self.selected_category
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn adapter(&self) -> &MemoAdapter<R> {
        &self.adapter
    }
}
