//! Core domain logic for the memo application.
//! This crate is the single source of truth for memo invariants; front ends
//! only drive the store, form and viewer types exported here.

pub mod config;
pub mod db;
pub mod display;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{open_repository, AppConfig, BackendKind, ConfigError, StorageConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryFilter, CATEGORY_ALL};
pub use model::memo::{Memo, MemoFormData, MemoId, MemoValidationError};
pub use repo::local_repo::{LocalMemoRepository, DEFAULT_STORAGE_KEY};
pub use repo::memo_repo::{MemoListQuery, MemoRepository, RepoError, RepoResult};
pub use repo::sqlite_repo::SqliteMemoRepository;
pub use service::memo_adapter::MemoAdapter;
pub use service::memo_form::{
    FormKey, FormSubmission, FormValidationError, KeyOutcome, MemoForm, TagInputError,
};
pub use service::memo_store::{MemoStats, MemoStore};
pub use service::memo_viewer::{
    DeleteConfirmation, DeleteOutcome, MemoViewer, ViewerHost, ViewerKey,
};
pub use service::sample_data::{NoSeed, SampleData, SampleSeeder};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
