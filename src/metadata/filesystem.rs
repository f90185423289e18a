use super::error::ResolveError;
use super::structs::FileTimeKind;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

/// Falls back to filesystem timestamps: birth time, then modification time,
/// then inode change time. Converted to host-local wall time so they line up
/// with the naive Exif dates.
pub fn read_file_time(path: &Path) -> Result<Option<(NaiveDateTime, FileTimeKind)>, ResolveError> {
    let metadata = std::fs::metadata(path)?;

    let found = metadata
        .created()
        .ok()
        .map(|t| (to_local(t), FileTimeKind::Birth))
        .or_else(|| {
            metadata
                .modified()
                .ok()
                .map(|t| (to_local(t), FileTimeKind::Modified))
        })
        .or_else(|| changed_time(&metadata).map(|t| (t, FileTimeKind::Changed)));

    Ok(found)
}

fn to_local(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

#[cfg(unix)]
fn changed_time(metadata: &Metadata) -> Option<NaiveDateTime> {
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    DateTime::from_timestamp(metadata.ctime(), nanos)
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

#[cfg(not(unix))]
fn changed_time(_metadata: &Metadata) -> Option<NaiveDateTime> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_a_recent_timestamp_for_new_file() {
        let file = NamedTempFile::new().unwrap();

        let (dt, kind) = read_file_time(file.path()).unwrap().unwrap();
        let now = Local::now().naive_local();
        assert!((now - dt).abs() < Duration::minutes(5));
        assert!(matches!(
            kind,
            FileTimeKind::Birth | FileTimeKind::Modified | FileTimeKind::Changed
        ));
    }

    #[test]
    fn test_errs_on_missing_file() {
        let result = read_file_time(Path::new("/definitely/not/here.jpg"));
        assert!(matches!(result, Err(ResolveError::Io(_))));
    }
}
