//! Text formatting for the rendered fields.

use crate::metadata::Location;
use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use std::fmt::Write;
use std::sync::LazyLock;
use tracing::warn;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z]+)\}").expect("valid placeholder regex"));
static SEPARATOR_AFTER_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([(\[{])[\s,|\-–]+").expect("valid separator after open bracket regex")
});
static SEPARATOR_BEFORE_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s,|\-–]+([)\]}])").expect("valid separator before close bracket regex")
});
static EMPTY_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[{]\s*[)\]}]").expect("valid empty group regex"));
static REPEATED_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*([,|\-–])(?:\s*[,|\-–])+").expect("valid separator regex")
});
static EDGE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s,|\-–]+|[\s,|\-–]+$").expect("valid edge separator regex")
});
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Substitutes `{name}` placeholders. Unknown or absent values become empty.
pub fn fill_template(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| lookup(&caps[1]).unwrap_or_default())
        .into_owned()
}

/// Removes what empty substitutions leave behind: empty bracket groups,
/// doubled or dangling separators and runs of whitespace.
pub fn clean_formatted(text: &str) -> String {
    // Separators hugging a bracket go first so `(, )` counts as empty.
    let text = SEPARATOR_AFTER_OPEN.replace_all(text, "$1");
    let text = SEPARATOR_BEFORE_CLOSE.replace_all(&text, "$1");
    let text = EMPTY_GROUP.replace_all(&text, "");
    let text = REPEATED_SEPARATOR.replace_all(&text, |caps: &Captures| {
        if &caps[1] == "," {
            ",".to_string()
        } else {
            format!(" {}", &caps[1])
        }
    });
    let text = EDGE_SEPARATOR.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Formats a location through its template. `None` when nothing is left.
pub fn format_location(template: &str, location: &Location) -> Option<String> {
    let filled = fill_template(template, |key| match key {
        "city" => location.city.clone(),
        "state" => location.state.clone(),
        "country" => location.country.clone(),
        _ => None,
    });
    let cleaned = clean_formatted(&filled);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Formats a date with a strftime pattern. An invalid pattern yields `None`
/// instead of panicking inside `Display`.
pub fn format_date(date: &NaiveDateTime, pattern: &str) -> Option<String> {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        warn!("Invalid date format pattern: {pattern}");
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn location(city: Option<&str>, state: Option<&str>, country: Option<&str>) -> Location {
        Location {
            city: city.map(String::from),
            state: state.map(String::from),
            country: country.map(String::from),
            has_coordinates: false,
        }
    }

    #[test]
    fn test_full_location() {
        let loc = location(Some("Amsterdam"), Some("North Holland"), Some("Netherlands"));
        assert_eq!(
            format_location("{city}, {state}, {country}", &loc).as_deref(),
            Some("Amsterdam, North Holland, Netherlands")
        );
    }

    #[test]
    fn test_missing_middle_field_leaves_no_double_comma() {
        let loc = location(Some("Paris"), None, Some("France"));
        assert_eq!(
            format_location("{city}, {state}, {country}", &loc).as_deref(),
            Some("Paris, France")
        );
    }

    #[test]
    fn test_empty_brackets_and_dangling_dash_are_removed() {
        let loc = location(Some("Naples"), None, None);
        assert_eq!(
            format_location("{city} ({state}) - {country}", &loc).as_deref(),
            Some("Naples")
        );

        let loc = location(None, None, Some("Italy"));
        assert_eq!(
            format_location("{city} - {state} - {country}", &loc).as_deref(),
            Some("Italy")
        );
    }

    #[test]
    fn test_dash_inside_names_survives() {
        let loc = location(Some("Saint-Denis"), None, Some("France"));
        assert_eq!(
            format_location("{city} [{state}] - {country}", &loc).as_deref(),
            Some("Saint-Denis - France")
        );
    }

    #[test]
    fn test_separators_inside_brackets_are_removed() {
        let template = "{city} ({state}, {country})";

        let loc = location(Some("Paris"), None, None);
        assert_eq!(format_location(template, &loc).as_deref(), Some("Paris"));

        let loc = location(Some("Paris"), Some("IDF"), None);
        assert_eq!(format_location(template, &loc).as_deref(), Some("Paris (IDF)"));

        let loc = location(Some("Paris"), None, Some("France"));
        assert_eq!(format_location(template, &loc).as_deref(), Some("Paris (France)"));
    }

    #[test]
    fn test_location_without_names_is_none() {
        let loc = Location {
            has_coordinates: true,
            ..Location::default()
        };
        assert_eq!(format_location("{city}, {state}, {country}", &loc), None);
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_formatted("  a   b  "), "a b");
        assert_eq!(clean_formatted("( ) , - |"), "");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 5)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap();
        assert_eq!(
            format_date(&date, "%B %-d, %Y").as_deref(),
            Some("June 5, 2021")
        );
        assert_eq!(format_date(&date, "%Q"), None);
    }
}
