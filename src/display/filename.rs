use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Strips the query string and fragment from an image source.
fn strip_query(src: &str) -> &str {
    src.split(['?', '#']).next().unwrap_or(src)
}

fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| s.to_string())
}

/// Derives the displayed filename from an image source URL or path.
///
/// `".../Sunset%20Bay.jpg?v=2"` becomes `"Sunset Bay.jpg"`.
pub fn filename_from_src(src: &str) -> String {
    let without_query = strip_query(src.trim());
    let last = without_query.rsplit('/').next().unwrap_or(without_query);
    decode(last)
}

/// Filesystem path behind a source, when the source names one directly
/// (`file://` URLs and absolute paths).
pub fn path_from_src(src: &str) -> Option<PathBuf> {
    let src = strip_query(src.trim());
    if let Some(rest) = src.strip_prefix("file://") {
        // `file://localhost/x` and `file:///x` both name `/x`.
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        return Some(PathBuf::from(decode(rest)));
    }
    if src.starts_with('/') {
        return Some(PathBuf::from(decode(src)));
    }
    None
}

/// Guess at the local location of `filename` inside the wallpaper directory.
pub fn local_path_guess(image_directory: Option<&Path>, filename: &str) -> Option<PathBuf> {
    if filename.is_empty() {
        return None;
    }
    image_directory.map(|dir| dir.join(filename))
}
