use thiserror::Error;

/// Failure of a single extraction step. Never crosses the resolver boundary:
/// the resolver logs it and moves on to the next source.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Exiftool failed to execute or process the file: {0}")]
    Exiftool(#[from] exiftool::ExifToolError),

    #[error("Could not parse embedded Exif data: {0}")]
    ExifParse(#[from] exif::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
