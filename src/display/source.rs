use std::path::PathBuf;
use tracing::debug;

/// The host surface the display agent polls: resolves a selector to the
/// current `src` of the tracked image. `None` means the element is not
/// mounted (yet).
pub trait ImageSource {
    fn image_src(&self, selector: &str) -> Option<String>;
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn image_src(&self, selector: &str) -> Option<String> {
        self(selector)
    }
}

/// Reads the current image source from a state file that the wallpaper
/// rotator rewrites on every change. A missing or empty file counts as an
/// unmounted element. The file tracks a single image, so the selector is
/// only used for logging.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileImageSource {
    fn image_src(&self, selector: &str) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let src = contents.lines().next().unwrap_or_default().trim();
                (!src.is_empty()).then(|| src.to_string())
            }
            Err(e) => {
                debug!(selector, path = %self.path.display(), "Image source not readable: {e}");
                None
            }
        }
    }
}
