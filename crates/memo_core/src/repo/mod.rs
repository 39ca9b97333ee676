//! Repository layer: storage backend contract and implementations.
//!
//! # Responsibility
//! - Define the backend-agnostic memo storage contract.
//! - Provide the relational (SQLite) and local key/value (JSON document)
//!   backends behind that contract.
//!
//! # Invariants
//! - Repository writes validate and canonicalize memos before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `StaleUpdate`) in
//!   addition to transport errors; converting them to failure markers is the
//!   adapter's job.

pub mod local_repo;
pub mod memo_repo;
pub mod sqlite_repo;
