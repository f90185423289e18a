use super::error::ResolveError;
use super::parsing::normalize_exif_date;
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const DATE_TAGS: [(Tag, &str); 3] = [
    (Tag::DateTimeOriginal, "DateTimeOriginal"),
    (Tag::DateTimeDigitized, "DateTimeDigitized"),
    (Tag::DateTime, "DateTime"),
];

/// Reads the creation date straight from the Exif block embedded in the file.
/// Used when exiftool is missing or has nothing to say.
pub fn read_exif_date(path: &Path) -> Result<Option<(NaiveDateTime, String)>, ResolveError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut reader)?;

    Ok(DATE_TAGS.iter().find_map(|(tag, name)| {
        let field = exif.get_field(*tag, In::PRIMARY)?;
        let exif::Value::Ascii(values) = &field.value else {
            return None;
        };
        let raw = std::str::from_utf8(values.first()?).ok()?;
        normalize_exif_date(raw).map(|dt| (dt, (*name).to_string()))
    }))
}
