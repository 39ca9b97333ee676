//! Memo form state machine.
//!
//! # Responsibility
//! - Hold the draft (title, content, category, tags) and the tag input
//!   buffer for create and edit flows.
//! - Validate submissions and report failures as user-visible messages.
//!
//! # Invariants
//! - The draft re-initializes only when the open flag or target memo id
//!   changes.
//! - Draft tags never contain duplicates (exact, case-sensitive match).
//! - Enter on the tag input adds a tag and never submits the form.

use crate::model::category::Category;
use crate::model::memo::{Memo, MemoFormData, MemoId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message shown when title or content is blank on submit.
pub const MISSING_FIELDS_MESSAGE: &str = "제목과 내용을 모두 입력해주세요.";

/// Key events delivered to the tag input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    Enter,
    Other,
}

/// Whether a key event was handled by the tag input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handled; the surrounding form must not act on it.
    Consumed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagInputError {
    Empty,
    Duplicate(String),
}

impl Display for TagInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "tag input is empty"),
            Self::Duplicate(tag) => write!(f, "tag `{tag}` is already present"),
        }
    }
}

impl Error for TagInputError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValidationError {
    /// Title or content is blank after trimming.
    MissingFields,
    /// Submit was attempted while the form is closed.
    NotOpen,
}

impl FormValidationError {
    /// Text suitable for an inline message or alert.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingFields => MISSING_FIELDS_MESSAGE,
            Self::NotOpen => "메모 작성 창이 열려 있지 않습니다.",
        }
    }
}

impl Display for FormValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

impl Error for FormValidationError {}

/// Validated payload emitted by a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub data: MemoFormData,
    /// Target memo for edits; `None` for a new memo.
    pub editing: Option<MemoId>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoForm {
    open: bool,
    editing: Option<MemoId>,
    draft: MemoFormData,
    tag_input: String,
    message: Option<String>,
}

impl MemoForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aligns the form with the caller's open flag and edit target.
    ///
    /// Returns `true` when the draft was re-initialized.
    pub fn sync(&mut self, open: bool, target: Option<&Memo>) -> bool {
        let target_id = target.map(|memo| memo.id);
        if open == self.open && target_id == self.editing {
            return false;
        }

        self.open = open;
        self.editing = target_id;
        self.draft = target.map(MemoFormData::from).unwrap_or_default();
        self.tag_input.clear();
        self.message = None;
        true
    }

    /// Opens an empty draft for a new memo.
    pub fn open_new(&mut self) {
        self.sync(true, None);
    }

    /// Opens a draft initialized from `memo`.
    pub fn open_edit(&mut self, memo: &Memo) {
        self.sync(true, Some(memo));
    }

    pub fn close(&mut self) {
        self.sync(false, None);
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<MemoId> {
        self.editing
    }

    pub fn draft(&self) -> &MemoFormData {
        &self.draft
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    /// Last validation message, cleared on re-initialization.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.draft.category = category;
    }

    pub fn set_tag_input(&mut self, value: impl Into<String>) {
        self.tag_input = value.into();
    }

    /// Appends the trimmed tag buffer to the draft and clears the buffer.
    ///
    /// # Errors
    /// - `Empty` for a blank buffer, `Duplicate` for an exact match; the
    ///   draft and buffer are left unchanged in both cases.
    pub fn add_tag(&mut self) -> Result<(), TagInputError> {
        let tag = self.tag_input.trim();
        if tag.is_empty() {
            return Err(TagInputError::Empty);
        }
        if self.draft.tags.iter().any(|existing| existing == tag) {
            return Err(TagInputError::Duplicate(tag.to_string()));
        }

        self.draft.tags.push(tag.to_string());
        self.tag_input.clear();
        Ok(())
    }

    /// Handles a key press on the tag input.
    pub fn handle_tag_key(&mut self, key: FormKey) -> KeyOutcome {
        match key {
            FormKey::Enter => {
                // Rejected tags are silently ignored, as with the add button.
                let _ = self.add_tag();
                KeyOutcome::Consumed
            }
            FormKey::Other => KeyOutcome::Ignored,
        }
    }

    /// Removes a tag by exact value. Returns whether anything was removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.draft.tags.len();
        self.draft.tags.retain(|existing| existing != tag);
        self.draft.tags.len() != before
    }

    /// Validates and emits the draft, then closes the form.
    ///
    /// # Errors
    /// - `MissingFields` when title or content is blank; the form stays
    ///   open and `message()` carries the user-visible text.
    pub fn submit(&mut self) -> Result<FormSubmission, FormValidationError> {
        if !self.open {
            return Err(FormValidationError::NotOpen);
        }
        if self.draft.title.trim().is_empty() || self.draft.content.trim().is_empty() {
            let err = FormValidationError::MissingFields;
            self.message = Some(err.user_message().to_string());
            return Err(err);
        }

        let submission = FormSubmission {
            data: self.draft.clone(),
            editing: self.editing,
        };
        self.close();
        Ok(submission)
    }
}
