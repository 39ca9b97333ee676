//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record, its category set and form payload.
//! - Own timestamp formatting so every backend stores the same text form.
//!
//! # Invariants
//! - Every memo is identified by a stable `MemoId`.
//! - Categories read from storage never fail; unknown ids use the default.

pub mod category;
pub mod memo;
pub mod timestamp;
