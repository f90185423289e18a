use super::error::ResolveError;
use super::exif_parser::read_exif_date;
use super::exiftool_reader::{ExiftoolReading, read_with_exiftool};
use super::filesystem::read_file_time;
use super::structs::{DateSource, ImageMetadata, Location};
use crate::install_check::exiftool_version;
use crate::protocol::ImageInfoRequest;
use bon::bon;
use chrono::NaiveDateTime;
use exiftool::ExifTool;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of the one-time exiftool probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAvailability {
    Available,
    Unavailable,
}

/// Resolves image metadata through an ordered chain of sources.
///
/// Whether exiftool is usable is decided once, at construction. A failing
/// exiftool call later on only affects that one request.
///
/// ```rust,no_run
/// # use mirror_image_info::metadata::MetadataResolver;
/// # use mirror_image_info::protocol::ImageInfoRequest;
/// let mut resolver = MetadataResolver::builder().include_location(true).build();
/// let result = resolver.resolve(&ImageInfoRequest::for_path("/pictures/Sunset Bay.jpg"));
/// println!("{:?}", result.creation_date);
/// ```
pub struct MetadataResolver {
    exiftool: Option<ExifTool>,
    include_location: bool,
}

#[bon]
impl MetadataResolver {
    /// # Builder Arguments
    ///
    /// * `exiftool_path: Option<PathBuf>` - A specific `exiftool` executable. If `None`, `exiftool` is searched for in the system's PATH.
    /// * `include_location: bool` - (Default: `false`) Also ask exiftool for location tags.
    /// * `probe_exiftool: bool` - (Default: `true`) Set to `false` to skip exiftool entirely and rely on the built-in sources.
    #[builder]
    pub fn new(
        exiftool_path: Option<PathBuf>,
        #[builder(default)] include_location: bool,
        #[builder(default = true)] probe_exiftool: bool,
    ) -> Self {
        let exiftool = if probe_exiftool {
            probe(exiftool_path.as_deref())
        } else {
            debug!("Exiftool probe disabled");
            None
        };
        Self {
            exiftool,
            include_location,
        }
    }

    pub fn availability(&self) -> ToolAvailability {
        if self.exiftool.is_some() {
            ToolAvailability::Available
        } else {
            ToolAvailability::Unavailable
        }
    }

    /// Produces a best-effort record for the requested image. Never fails: a
    /// missing file gives a record holding only the filename.
    pub fn resolve(&mut self, request: &ImageInfoRequest) -> ImageMetadata {
        let candidates = request.candidate_paths();
        let existing = candidates.iter().find(|p| p.exists());

        let filename = if request.filename.is_empty() {
            existing
                .or(candidates.first())
                .and_then(|p| p.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            request.filename.clone()
        };

        let mut result = ImageMetadata::empty(filename);
        let Some(path) = existing else {
            debug!(filename = %result.filename, "No readable file for image, returning empty record");
            return result;
        };

        let include_location = self.include_location;
        let reading = self
            .exiftool
            .as_mut()
            .map(|exiftool| read_with_exiftool(exiftool, path, include_location));
        let (found, location) = date_and_location(path, reading);

        if let Some((creation_date, source)) = found {
            result.creation_date = Some(creation_date);
            result.date_source = Some(source);
        }
        if self.include_location {
            result.location = location;
        }

        info!(
            filename = %result.filename,
            creation_date = ?result.creation_date,
            source = ?result.date_source,
            "Resolved image info"
        );
        result
    }
}

/// Walks the fallback chain after the exiftool step. `reading` is `None`
/// when exiftool is unavailable; a failed reading falls through like a
/// missing one.
fn date_and_location(
    path: &Path,
    reading: Option<Result<ExiftoolReading, ResolveError>>,
) -> (Option<(NaiveDateTime, DateSource)>, Option<Location>) {
    let (found, location) = match reading {
        Some(Ok(reading)) => (
            reading
                .date
                .map(|(dt, tag)| (dt, DateSource::Exiftool(tag))),
            reading.location,
        ),
        Some(Err(e)) => {
            warn!(path = %path.display(), "Exiftool lookup failed: {e}");
            (None, None)
        }
        None => (None, None),
    };

    let found = found
        .or_else(|| {
            attempt("exif parser", path, || read_exif_date(path))
                .map(|(dt, tag)| (dt, DateSource::ExifParser(tag)))
        })
        .or_else(|| {
            attempt("filesystem", path, || read_file_time(path))
                .map(|(dt, kind)| (dt, DateSource::Filesystem(kind)))
        });
    (found, location)
}

/// Runs one extraction step, logging and swallowing its error.
fn attempt<T>(
    step: &str,
    path: &Path,
    f: impl FnOnce() -> Result<Option<T>, ResolveError>,
) -> Option<T> {
    match f() {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), "{step} lookup failed: {e}");
            None
        }
    }
}

fn probe(exiftool_path: Option<&Path>) -> Option<ExifTool> {
    let executable = exiftool_path.unwrap_or(Path::new("exiftool"));
    match exiftool_version(executable) {
        Ok(version) => info!("Found exiftool {version}"),
        Err(e) => {
            warn!("Exiftool not available, using built-in metadata sources: {e}");
            return None;
        }
    }

    let exiftool = match exiftool_path {
        Some(path) => ExifTool::with_executable(path),
        None => ExifTool::new(),
    };
    exiftool
        .inspect_err(|e| warn!("Exiftool could not be started: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::exif_parser::tests::tiff_with_datetime;
    use crate::metadata::structs::FileTimeKind;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn resolver_without_tool(include_location: bool) -> MetadataResolver {
        MetadataResolver::builder()
            .probe_exiftool(false)
            .include_location(include_location)
            .build()
    }

    #[test]
    fn test_missing_tool_path_is_unavailable() {
        let resolver = MetadataResolver::builder()
            .exiftool_path(PathBuf::from("/nonexistent/bin/exiftool"))
            .build();
        assert_eq!(resolver.availability(), ToolAvailability::Unavailable);
    }

    #[test]
    fn test_nonexistent_file_gives_empty_record() {
        let mut resolver = resolver_without_tool(true);
        let request = ImageInfoRequest {
            path: Some(PathBuf::from("/nonexistent/Sunset Bay.jpg")),
            filename: "Sunset Bay.jpg".to_string(),
            local_path: None,
        };

        let result = resolver.resolve(&request);
        assert_eq!(result, ImageMetadata::empty("Sunset Bay.jpg"));
    }

    #[test]
    fn test_filename_falls_back_to_basename() {
        let mut resolver = resolver_without_tool(false);
        let result = resolver.resolve(&ImageInfoRequest::for_path("/nonexistent/dir/beach.png"));
        assert_eq!(result.filename, "beach.png");
        assert_eq!(result.creation_date, None);
    }

    #[test]
    fn test_embedded_exif_date_beats_filesystem() {
        let mut file = Builder::new().suffix(".tif").tempfile().unwrap();
        file.write_all(&tiff_with_datetime("2015:12:24 18:00:00"))
            .unwrap();

        let mut resolver = resolver_without_tool(false);
        let result = resolver.resolve(&ImageInfoRequest::for_path(file.path()));

        assert_eq!(
            result.creation_date,
            NaiveDate::from_ymd_opt(2015, 12, 24).and_then(|d| d.and_hms_opt(18, 0, 0))
        );
        assert_eq!(
            result.date_source,
            Some(DateSource::ExifParser("DateTime".to_string()))
        );
    }

    #[test]
    fn test_plain_file_uses_filesystem_time_and_no_location() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"plain text").unwrap();

        let mut resolver = resolver_without_tool(true);
        let result = resolver.resolve(&ImageInfoRequest::for_path(file.path()));

        assert!(result.creation_date.is_some());
        assert!(matches!(
            result.date_source,
            Some(DateSource::Filesystem(
                FileTimeKind::Birth | FileTimeKind::Modified | FileTimeKind::Changed
            ))
        ));
        assert_eq!(result.location, None);
    }

    #[test]
    fn test_local_path_is_used_when_path_is_missing() {
        let file = NamedTempFile::new().unwrap();
        let request = ImageInfoRequest {
            path: Some(PathBuf::from("/nonexistent/image.jpg")),
            filename: "image.jpg".to_string(),
            local_path: Some(file.path().to_path_buf()),
        };

        let mut resolver = resolver_without_tool(false);
        let result = resolver.resolve(&request);

        assert_eq!(result.filename, "image.jpg");
        assert!(result.creation_date.is_some());
    }

    fn exiftool_failure() -> Option<Result<ExiftoolReading, ResolveError>> {
        Some(Err(ResolveError::Io(std::io::Error::other(
            "exiftool stopped responding",
        ))))
    }

    #[test]
    fn test_failed_exiftool_call_falls_through_to_exif_parser() {
        let mut file = Builder::new().suffix(".tif").tempfile().unwrap();
        file.write_all(&tiff_with_datetime("2019:07:14 09:15:30"))
            .unwrap();

        let (found, location) = date_and_location(file.path(), exiftool_failure());

        assert_eq!(
            found,
            Some((
                NaiveDate::from_ymd_opt(2019, 7, 14)
                    .and_then(|d| d.and_hms_opt(9, 15, 30))
                    .unwrap(),
                DateSource::ExifParser("DateTime".to_string())
            ))
        );
        assert_eq!(location, None);
    }

    #[test]
    fn test_failed_exiftool_call_falls_through_to_filesystem() {
        let file = NamedTempFile::new().unwrap();

        let (found, location) = date_and_location(file.path(), exiftool_failure());

        assert!(matches!(found, Some((_, DateSource::Filesystem(_)))));
        assert_eq!(location, None);
    }

    #[test]
    fn test_exiftool_reading_wins_and_keeps_location() {
        let mut file = Builder::new().suffix(".tif").tempfile().unwrap();
        file.write_all(&tiff_with_datetime("2015:12:24 18:00:00"))
            .unwrap();
        let taken = NaiveDate::from_ymd_opt(2021, 3, 2)
            .and_then(|d| d.and_hms_opt(11, 45, 0))
            .unwrap();
        let place = Location {
            city: Some("Utrecht".to_string()),
            state: None,
            country: Some("Netherlands".to_string()),
            has_coordinates: true,
        };
        let reading = ExiftoolReading {
            date: Some((taken, "DateTimeOriginal".to_string())),
            location: Some(place.clone()),
        };

        let (found, location) = date_and_location(file.path(), Some(Ok(reading)));

        assert_eq!(
            found,
            Some((taken, DateSource::Exiftool("DateTimeOriginal".to_string())))
        );
        assert_eq!(location, Some(place));
    }

    #[test]
    fn test_exiftool_reading_without_date_still_falls_through() {
        let mut file = Builder::new().suffix(".tif").tempfile().unwrap();
        file.write_all(&tiff_with_datetime("2015:12:24 18:00:00"))
            .unwrap();

        let (found, _) = date_and_location(file.path(), Some(Ok(ExiftoolReading::default())));

        assert!(matches!(found, Some((_, DateSource::ExifParser(_)))));
    }
}
