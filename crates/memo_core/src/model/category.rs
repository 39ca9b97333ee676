//! Memo category enumeration and list filter.
//!
//! # Responsibility
//! - Define the fixed category set with storage ids, labels and colors.
//! - Parse storage values leniently so unknown ids never fail a read.
//!
//! # Invariants
//! - Storage ids are stable lowercase ASCII strings.
//! - Unknown or blank ids resolve to `Category::default()`.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Sentinel id used by callers to mean "no category filter".
pub const CATEGORY_ALL: &str = "all";

/// Fixed classification attached to every memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Everyday notes. Default for new drafts.
    #[default]
    Personal,
    Work,
    Study,
    Idea,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Personal,
        Category::Work,
        Category::Study,
        Category::Idea,
        Category::Other,
    ];

    /// Stable id persisted in storage backends.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Study => "study",
            Self::Idea => "idea",
            Self::Other => "other",
        }
    }

    /// Human-readable label shown next to a memo.
    pub fn label(self) -> &'static str {
        match self {
            Self::Personal => "일반",
            Self::Work => "업무",
            Self::Study => "학습",
            Self::Idea => "아이디어",
            Self::Other => "기타",
        }
    }

    /// Badge color as a CSS hex value.
    pub fn color(self) -> &'static str {
        match self {
            Self::Personal => "#3b82f6",
            Self::Work => "#22c55e",
            Self::Study => "#a855f7",
            Self::Idea => "#eab308",
            Self::Other => "#6b7280",
        }
    }

    /// Strict parse. Returns `None` for anything outside the fixed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "personal" => Some(Self::Personal),
            "work" => Some(Self::Work),
            "study" => Some(Self::Study),
            "idea" => Some(Self::Idea),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Lenient parse used on every read path.
    ///
    /// Unrecognized values fall back to the default category and are
    /// reported through the log facade instead of failing the read.
    pub fn from_storage(value: &str) -> Self {
        match Self::parse(value) {
            Some(category) => category,
            None => {
                warn!(
                    "event=category_fallback module=model status=warn raw_len={} fallback={}",
                    value.len(),
                    Self::default().as_str()
                );
                Self::default()
            }
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Self::from_storage)
            .unwrap_or_default())
    }
}

/// Category selector for list views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Pass-through; every memo matches.
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parses `all` or a strict category id.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed == CATEGORY_ALL {
            return Some(Self::All);
        }
        Category::parse(trimmed).map(Self::Only)
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => CATEGORY_ALL,
            Self::Only(category) => category.as_str(),
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        Self::Only(value)
    }
}
