//! Presentation helpers shared by memo list and viewer renderings.
//!
//! # Responsibility
//! - Render memo timestamps in the long Korean date+time form.
//! - Derive a single-line plain-text preview from markdown content.
//!
//! # Invariants
//! - Helpers never fail; unparsable input degrades to the raw value.

use chrono::{DateTime, FixedOffset, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Formats a stored timestamp in its own offset.
///
/// Example: `2025-08-01T15:04:00.000Z` -> `2025년 8월 1일 오후 03:04`.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => format_korean_long(&parsed),
        Err(_) => raw.to_string(),
    }
}

/// Formats a stored timestamp after shifting it into `offset`.
pub fn format_timestamp_at(raw: &str, offset: &FixedOffset) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => format_korean_long(&parsed.with_timezone(offset)),
        Err(_) => raw.to_string(),
    }
}

fn format_korean_long(instant: &DateTime<FixedOffset>) -> String {
    let (is_pm, hour12) = instant.hour12();
    let meridiem = if is_pm { "오후" } else { "오전" };
    format!(
        "{} {} {:02}:{:02}",
        instant.format("%Y년 %-m월 %-d일"),
        meridiem,
        hour12,
        instant.minute()
    )
}

/// Derives a plain-text preview from markdown content.
///
/// Images are dropped, links keep their text, markdown symbols are removed,
/// whitespace collapses to single spaces and the result is capped at 100
/// chars. Returns `None` when nothing readable remains.
pub fn markdown_preview(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}
