//! Memo use-case services.
//!
//! # Responsibility
//! - Wrap a storage backend in the never-failing adapter contract.
//! - Own session state (store) and the form/viewer interaction flows.
//! - Keep front ends decoupled from storage details.

pub mod memo_adapter;
pub mod memo_form;
pub mod memo_store;
pub mod memo_viewer;
pub mod sample_data;
