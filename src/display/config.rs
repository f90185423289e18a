use crate::error::ImageInfoError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A piece of information the widget can show.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FileName,
    CreationDate,
    Location,
}

/// Static widget configuration, fixed once the agent starts.
///
/// Every field has a default, so a config file only needs the keys it changes:
/// ```json
/// { "updateInterval": 10000, "showLocation": true, "imageDirectory": "/home/pi/Pictures" }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    /// How often the tracked image is checked, in milliseconds on the wire.
    #[serde(
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub update_interval: Duration,
    pub header_text: String,
    pub show_file_name: bool,
    pub show_creation_date: bool,
    pub show_location: bool,
    pub field_order: Vec<Field>,
    /// chrono strftime pattern.
    pub date_format: String,
    /// Template over `{city}`, `{state}` and `{country}`.
    pub location_format: String,
    pub separator: String,
    pub text_class: String,
    pub wallpaper_selector: String,
    /// Where wallpapers live locally, used to guess a path from a URL.
    pub image_directory: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(5000),
            header_text: String::new(),
            show_file_name: true,
            show_creation_date: true,
            show_location: false,
            field_order: vec![Field::FileName, Field::CreationDate, Field::Location],
            date_format: "%B %-d, %Y".to_string(),
            location_format: "{city}, {state}, {country}".to_string(),
            separator: " - ".to_string(),
            text_class: "small".to_string(),
            wallpaper_selector: ".MMM-Wallpaper img".to_string(),
            image_directory: None,
        }
    }
}

impl DisplayConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ImageInfoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ImageInfoError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn is_enabled(&self, field: Field) -> bool {
        match field {
            Field::FileName => self.show_file_name,
            Field::CreationDate => self.show_creation_date,
            Field::Location => self.show_location,
        }
    }

    /// Enabled fields in display order, each at most once.
    pub fn visible_fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::with_capacity(self.field_order.len());
        for field in &self.field_order {
            if self.is_enabled(*field) && !fields.contains(field) {
                fields.push(*field);
            }
        }
        fields
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}
