use thiserror::Error;

/// The primary error type for the mirror-image-info crate.
///
/// Metadata resolution itself never returns an error; these cover the
/// surfaces around it (configuration, tool checks, the helper's stdio).
#[derive(Error, Debug)]
pub enum ImageInfoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Exiftool version query failed: {0}")]
    VersionQuery(String),

    #[error("Metadata helper stopped")]
    HelperStopped,
}
