//! Read-only memo viewer state.
//!
//! # Responsibility
//! - Track the selected memo and its open state.
//! - Route edit and confirmed delete requests.
//! - Toggle background scrolling through the host while open.
//!
//! # Invariants
//! - Background scrolling is disabled exactly while the viewer is open.
//! - Delete reaches the store only after the confirmation collaborator
//!   agrees.

use crate::display::format_timestamp;
use crate::model::memo::Memo;
use crate::repo::memo_repo::MemoRepository;
use crate::service::memo_store::MemoStore;

/// Prompt shown before deleting the viewed memo.
pub const DELETE_CONFIRM_PROMPT: &str = "정말로 이 메모를 삭제하시겠습니까?";

/// Key events delivered while the viewer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    Escape,
    Other,
}

/// Page-level side effects controlled by the viewer.
pub trait ViewerHost {
    fn set_background_scroll(&mut self, enabled: bool);
}

/// Interactive yes/no confirmation before deletion.
pub trait DeleteConfirmation {
    fn confirm_delete(&mut self, memo: &Memo, prompt: &str) -> bool;
}

impl<F> DeleteConfirmation for F
where
    F: FnMut(&Memo, &str) -> bool,
{
    fn confirm_delete(&mut self, memo: &Memo, prompt: &str) -> bool {
        self(memo, prompt)
    }
}

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    Failed,
    /// Nothing was being viewed.
    NoSelection,
}

#[derive(Debug, Clone, Default)]
pub struct MemoViewer {
    memo: Option<Memo>,
}

impl MemoViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `memo` and disables background scrolling.
    pub fn open<H: ViewerHost + ?Sized>(&mut self, memo: Memo, host: &mut H) {
        if self.memo.is_none() {
            host.set_background_scroll(false);
        }
        self.memo = Some(memo);
    }

    /// Hides the viewer and restores background scrolling.
    pub fn close<H: ViewerHost + ?Sized>(&mut self, host: &mut H) {
        if self.memo.take().is_some() {
            host.set_background_scroll(true);
        }
    }

    /// Escape closes an open viewer. Returns whether the viewer closed.
    pub fn handle_key<H: ViewerHost + ?Sized>(&mut self, key: ViewerKey, host: &mut H) -> bool {
        if key == ViewerKey::Escape && self.is_open() {
            self.close(host);
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.memo.is_some()
    }

    pub fn memo(&self) -> Option<&Memo> {
        self.memo.as_ref()
    }

    /// Hands the memo to the edit flow and closes the viewer.
    pub fn edit<H: ViewerHost + ?Sized>(&mut self, host: &mut H) -> Option<Memo> {
        let memo = self.memo.clone()?;
        self.close(host);
        Some(memo)
    }

    /// Deletes the viewed memo after confirmation, then closes.
    pub fn delete<R, C, H>(
        &mut self,
        store: &mut MemoStore<R>,
        confirm: &mut C,
        host: &mut H,
    ) -> DeleteOutcome
    where
        R: MemoRepository,
        C: DeleteConfirmation + ?Sized,
        H: ViewerHost + ?Sized,
    {
        let Some(memo) = self.memo.as_ref() else {
            return DeleteOutcome::NoSelection;
        };
        if !confirm.confirm_delete(memo, DELETE_CONFIRM_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        let id = memo.id;
        self.close(host);
        if store.delete_memo(id) {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Failed
        }
    }

    /// Display label of the viewed memo's category.
    pub fn category_label(&self) -> Option<&'static str> {
        self.memo.as_ref().map(|memo| memo.category.label())
    }

    pub fn category_color(&self) -> Option<&'static str> {
        self.memo.as_ref().map(|memo| memo.category.color())
    }

    pub fn created_label(&self) -> Option<String> {
        self.memo
            .as_ref()
            .map(|memo| format_timestamp(&memo.created_at))
    }

    /// Formatted `updated_at`, only when it differs from `created_at`.
    pub fn updated_label(&self) -> Option<String> {
        self.memo
            .as_ref()
            .filter(|memo| memo.updated_at != memo.created_at)
            .map(|memo| format_timestamp(&memo.updated_at))
    }
}
