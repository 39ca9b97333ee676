//! Memo domain model.
//!
//! # Responsibility
//! - Define the single persisted record and the form payload that creates
//!   or edits it.
//! - Validate record-level invariants before any backend write.
//!
//! # Invariants
//! - `id` is stable and never reassigned.
//! - `created_at <= updated_at`.
//! - `tags` contains no duplicates (exact, case-sensitive comparison).
//! - `title` and `content` are non-blank.
//! - Persisted timestamps are canonical UTC text (`canonicalized`).

use crate::model::category::Category;
use crate::model::timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a memo.
pub type MemoId = Uuid;

/// Persisted memo record.
///
/// Serialized with camelCase names; this is the local-storage shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: MemoId,
    pub title: String,
    /// Markdown body.
    pub content: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Editable fields collected by the memo form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoFormData {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
}

impl MemoFormData {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&Memo> for MemoFormData {
    fn from(memo: &Memo) -> Self {
        Self {
            title: memo.title.clone(),
            content: memo.content.clone(),
            category: memo.category,
            tags: memo.tags.clone(),
        }
    }
}

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    BlankTitle,
    BlankContent,
    BlankTag,
    DuplicateTag(String),
    InvalidTimestamp { field: &'static str, value: String },
    TimestampOrder { created_at: String, updated_at: String },
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "memo title must not be blank"),
            Self::BlankContent => write!(f, "memo content must not be blank"),
            Self::BlankTag => write!(f, "memo tags must not be blank"),
            Self::DuplicateTag(tag) => write!(f, "duplicate memo tag `{tag}`"),
            Self::InvalidTimestamp { field, value } => {
                write!(f, "invalid timestamp `{value}` in {field}")
            }
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at `{updated_at}` precedes created_at `{created_at}`"
            ),
        }
    }
}

impl Error for MemoValidationError {}

impl MemoValidationError {
    /// Variant name without the offending value, safe for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BlankTitle => "blank_title",
            Self::BlankContent => "blank_content",
            Self::BlankTag => "blank_tag",
            Self::DuplicateTag(_) => "duplicate_tag",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
            Self::TimestampOrder { .. } => "timestamp_order",
        }
    }
}

impl Memo {
    /// Builds a new memo from form data with a fresh id and both
    /// timestamps set to the same instant.
    pub fn create(data: MemoFormData) -> Self {
        let stamp = timestamp::now();
        Self::with_id(Uuid::new_v4(), data, stamp)
    }

    /// Builds a memo with caller-provided identity (import/seed paths).
    pub fn with_id(id: MemoId, data: MemoFormData, created_at: String) -> Self {
        Self {
            id,
            title: data.title,
            content: data.content,
            category: data.category,
            tags: data.tags,
            updated_at: created_at.clone(),
            created_at,
        }
    }

    /// Returns a copy with `data` merged over the editable fields and a
    /// refreshed `updated_at`. `id` and `created_at` are preserved.
    pub fn edited(&self, data: MemoFormData) -> Self {
        Self {
            id: self.id,
            title: data.title,
            content: data.content,
            category: data.category,
            tags: data.tags,
            created_at: self.created_at.clone(),
            updated_at: timestamp::later_than(&self.updated_at),
        }
    }

    /// Case-insensitive substring match over title, content and tags.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }

    /// Validates and returns a copy whose timestamps are rewritten in the
    /// canonical UTC form, so stored text orders chronologically.
    pub fn canonicalized(&self) -> Result<Self, MemoValidationError> {
        self.validate()?;
        let mut memo = self.clone();
        for field in [&mut memo.created_at, &mut memo.updated_at] {
            if let Some(instant) = timestamp::parse(field.as_str()) {
                *field = timestamp::format(instant);
            }
        }
        Ok(memo)
    }

    /// Validates record invariants.
    ///
    /// # Errors
    /// - Blank title/content/tag, duplicate tag.
    /// - Unparsable timestamps or `updated_at` earlier than `created_at`.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        if self.title.trim().is_empty() {
            return Err(MemoValidationError::BlankTitle);
        }
        if self.content.trim().is_empty() {
            return Err(MemoValidationError::BlankContent);
        }

        let mut seen = HashSet::with_capacity(self.tags.len());
        for tag in &self.tags {
            if tag.trim().is_empty() {
                return Err(MemoValidationError::BlankTag);
            }
            if !seen.insert(tag.as_str()) {
                return Err(MemoValidationError::DuplicateTag(tag.clone()));
            }
        }

        let created = timestamp::parse(&self.created_at).ok_or_else(|| {
            MemoValidationError::InvalidTimestamp {
                field: "created_at",
                value: self.created_at.clone(),
            }
        })?;
        let updated = timestamp::parse(&self.updated_at).ok_or_else(|| {
            MemoValidationError::InvalidTimestamp {
                field: "updated_at",
                value: self.updated_at.clone(),
            }
        })?;
        if updated < created {
            return Err(MemoValidationError::TimestampOrder {
                created_at: self.created_at.clone(),
                updated_at: self.updated_at.clone(),
            });
        }

        Ok(())
    }
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{Memo, MemoFormData, MemoValidationError};
    use crate::model::category::Category;

    fn sample() -> Memo {
        Memo::create(
            MemoFormData::new("Title", "Body", Category::Work).with_tags(["rust", "Notes"]),
        )
    }

    #[test]
    fn create_sets_equal_timestamps() {
        let memo = sample();
        assert_eq!(memo.created_at, memo.updated_at);
        memo.validate().unwrap();
    }

    #[test]
    fn edited_preserves_identity_and_creation_time() {
        let memo = sample();
        let edited = memo.edited(MemoFormData::new("New", "Other", Category::Idea));
        assert_eq!(edited.id, memo.id);
        assert_eq!(edited.created_at, memo.created_at);
        assert!(edited.updated_at >= memo.updated_at);
        assert_eq!(edited.category, Category::Idea);
    }

    #[test]
    fn validate_rejects_duplicate_and_blank_values() {
        let mut memo = sample();
        memo.tags = vec!["a".to_string(), "a".to_string()];
        assert_eq!(
            memo.validate(),
            Err(MemoValidationError::DuplicateTag("a".to_string()))
        );

        let mut memo = sample();
        memo.title = "   ".to_string();
        assert_eq!(memo.validate(), Err(MemoValidationError::BlankTitle));
    }

    #[test]
    fn validate_rejects_updated_before_created() {
        let mut memo = sample();
        memo.created_at = "2025-01-02T00:00:00.000Z".to_string();
        memo.updated_at = "2025-01-01T00:00:00.000Z".to_string();
        assert!(matches!(
            memo.validate(),
            Err(MemoValidationError::TimestampOrder { .. })
        ));
    }

    #[test]
    fn canonicalized_rewrites_offsets_to_utc() {
        let mut memo = sample();
        memo.created_at = "2025-01-01T08:00:00+09:00".to_string();
        memo.updated_at = "2025-01-01T00:00:00.000Z".to_string();

        let canonical = memo.canonicalized().unwrap();
        assert_eq!(canonical.created_at, "2024-12-31T23:00:00.000Z");
        assert_eq!(canonical.updated_at, "2025-01-01T00:00:00.000Z");
        assert_eq!(canonical.id, memo.id);
    }

    #[test]
    fn validation_kind_omits_user_text() {
        let err = MemoValidationError::DuplicateTag("private".to_string());
        assert_eq!(err.kind(), "duplicate_tag");
    }

    #[test]
    fn query_matching_is_case_insensitive_over_tags() {
        let memo = sample();
        assert!(memo.matches_query("notes"));
        assert!(memo.matches_query("tit"));
        assert!(!memo.matches_query("missing"));
    }

    #[test]
    fn camel_case_shape_tolerates_missing_tags() {
        let raw = r#"{
            "id": "6f1c1e7a-4a49-4d55-9a53-0c3f7f7f0c11",
            "title": "t",
            "content": "c",
            "category": "unknown",
            "tags": null,
            "createdAt": "2025-01-01T00:00:00.000Z",
            "updatedAt": "2025-01-01T00:00:00.000Z"
        }"#;
        let memo: Memo = serde_json::from_str(raw).unwrap();
        assert!(memo.tags.is_empty());
        assert_eq!(memo.category, Category::Personal);

        let encoded = serde_json::to_value(&memo).unwrap();
        assert!(encoded.get("createdAt").is_some());
    }
}
