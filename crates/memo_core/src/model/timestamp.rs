//! Sortable textual timestamps.
//!
//! Memo timestamps are RFC 3339 UTC strings with fixed millisecond
//! precision, so lexicographic order equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats one instant in the canonical memo timestamp form.
pub fn format(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the current time in canonical form.
pub fn now() -> String {
    format(Utc::now())
}

/// Returns the current time, clamped to never precede `previous`.
///
/// Used when refreshing `updated_at` so a wall clock stepping backwards
/// cannot break `created_at <= updated_at`.
pub fn later_than(previous: &str) -> String {
    let current = Utc::now();
    match parse(previous) {
        Some(prev) if prev > current => format(prev),
        _ => format(current),
    }
}

/// Parses any RFC 3339 timestamp into UTC.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{format, later_than, now, parse};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn canonical_form_has_millis_and_zulu_suffix() {
        let instant = Utc.with_ymd_and_hms(2025, 8, 1, 15, 4, 5).unwrap();
        assert_eq!(format(instant), "2025-08-01T15:04:05.000Z");
    }

    #[test]
    fn later_than_never_goes_backwards() {
        let future = format(Utc::now() + Duration::hours(1));
        assert_eq!(later_than(&future), future);

        let past = "2000-01-01T00:00:00.000Z";
        assert!(later_than(past).as_str() > past);
    }

    #[test]
    fn now_is_parseable() {
        assert!(parse(&now()).is_some());
        assert!(parse("yesterday").is_none());
    }
}
