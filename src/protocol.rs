//! Messages exchanged between the display agent and the metadata helper.

use crate::metadata::ImageMetadata;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `GET_IMAGE_INFO` payload.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfoRequest {
    /// Known filesystem path of the image, if the display knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Decoded filename the display is tracking. Results are matched on it.
    #[serde(default)]
    pub filename: String,
    /// Best guess at where the image lives locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl ImageInfoRequest {
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            path: Some(path.to_path_buf()),
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            local_path: None,
        }
    }

    /// Paths worth trying, most specific first.
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self
            .path
            .iter()
            .chain(self.local_path.iter())
            .cloned()
            .collect();
        if candidates.is_empty() && !self.filename.is_empty() {
            candidates.push(PathBuf::from(&self.filename));
        }
        candidates
    }
}

/// `IMAGE_INFO_RESULT` payload.
pub type ImageInfoResult = ImageMetadata;

/// A named notification as it travels over a line-delimited JSON channel.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(
    tag = "notification",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum Notification {
    GetImageInfo(ImageInfoRequest),
    ImageInfoResult(ImageInfoResult),
}
