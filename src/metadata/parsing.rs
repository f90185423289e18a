//! Utility functions for turning Exif date strings into chrono types.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Parses a naive datetime string as found in Exif (YYYY:MM:DD HH:MM:SS[.fff]).
pub fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parses a datetime string carrying a timezone offset (e.g. `FileCreateDate`).
pub fn parse_datetime_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f%z")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok())
}

/// Normalizes any date string a metadata source may hand back into a single
/// wall-clock representation. Offsets are dropped after applying them to the
/// local reading, so `08:30:00+02:00` stays `08:30:00`.
///
/// Zeroed placeholders such as `0000:00:00 00:00:00` yield `None`.
pub fn normalize_exif_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_end_matches('\0');
    if s.is_empty() {
        return None;
    }
    parse_naive(s).or_else(|| parse_datetime_offset(s).map(|dt| dt.naive_local()))
}
