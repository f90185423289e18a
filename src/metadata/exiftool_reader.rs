use super::error::ResolveError;
use super::parsing::normalize_exif_date;
use super::structs::Location;
use chrono::NaiveDateTime;
use exiftool::ExifTool;
use serde_json::Value;
use std::path::Path;

/// Date tags requested from exiftool, in order of preference.
const DATE_TAGS: [&str; 3] = ["DateTimeOriginal", "CreateDate", "FileCreateDate"];

/// Location tags, only requested when location lookup is enabled.
const LOCATION_TAGS: [&str; 7] = [
    "City",
    "State",
    "Province-State",
    "Country",
    "Country-PrimaryLocationName",
    "GPSLatitude",
    "GPSLongitude",
];

#[derive(Debug, Default, PartialEq)]
pub struct ExiftoolReading {
    pub date: Option<(NaiveDateTime, String)>,
    pub location: Option<Location>,
}

pub fn exiftool_args(include_location: bool) -> Vec<String> {
    let location_tags: &[&str] = if include_location { &LOCATION_TAGS } else { &[] };
    std::iter::once("-n".to_string())
        .chain(
            DATE_TAGS
                .iter()
                .chain(location_tags)
                .map(|tag| format!("-{tag}")),
        )
        .collect()
}

/// Runs exiftool once against `path` and interprets its JSON output.
pub fn read_with_exiftool(
    exiftool: &mut ExifTool,
    path: &Path,
    include_location: bool,
) -> Result<ExiftoolReading, ResolveError> {
    let args = exiftool_args(include_location);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let exif = exiftool.json(path, &args)?;
    Ok(interpret(&exif, include_location))
}

pub fn interpret(exif: &Value, include_location: bool) -> ExiftoolReading {
    ExiftoolReading {
        date: date_from_exif(exif),
        location: if include_location {
            location_from_exif(exif)
        } else {
            None
        },
    }
}

/// First date tag that parses wins.
pub fn date_from_exif(exif: &Value) -> Option<(NaiveDateTime, String)> {
    DATE_TAGS.iter().find_map(|tag| {
        let raw = exif.get(*tag)?.as_str()?;
        normalize_exif_date(raw).map(|dt| (dt, (*tag).to_string()))
    })
}

pub fn location_from_exif(exif: &Value) -> Option<Location> {
    let get_name = |keys: &[&str]| -> Option<String> {
        keys.iter().find_map(|key| {
            exif.get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
    };

    let has_coordinates = matches!(
        (
            exif.get("GPSLatitude").and_then(Value::as_f64),
            exif.get("GPSLongitude").and_then(Value::as_f64),
        ),
        (Some(_), Some(_))
    );

    let location = Location {
        city: get_name(&["City"]),
        state: get_name(&["State", "Province-State"]),
        country: get_name(&["Country", "Country-PrimaryLocationName"]),
        has_coordinates,
    };

    (location.has_names() || location.has_coordinates).then_some(location)
}
