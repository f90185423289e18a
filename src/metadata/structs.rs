use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Metadata about one wallpaper image, built fresh for every request.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Basename of the image file.
    pub filename: String,

    /// Best-effort creation time as wall-clock time, without timezone context.
    /// `None` when no source could provide one.
    #[serde(default)]
    pub creation_date: Option<NaiveDateTime>,

    /// Named location, only present when location lookup was requested and
    /// `exiftool` reported something.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Which source produced `creation_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_source: Option<DateSource>,
}

impl ImageMetadata {
    /// A record carrying only the filename.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            creation_date: None,
            location: None,
            date_source: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    /// GPS coordinates were present. Coordinates are never turned into names.
    #[serde(default)]
    pub has_coordinates: bool,
}

impl Location {
    pub fn has_names(&self) -> bool {
        self.city.is_some() || self.state.is_some() || self.country.is_some()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum DateSource {
    /// Tag name reported by `exiftool`.
    Exiftool(String),
    /// Tag name read by the built-in Exif parser.
    ExifParser(String),
    Filesystem(FileTimeKind),
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FileTimeKind {
    Birth,
    Modified,
    Changed,
}
