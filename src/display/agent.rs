use super::config::{DisplayConfig, Field};
use super::filename::{filename_from_src, local_path_guess, path_from_src};
use super::format::{format_date, format_location};
use super::fragment::Fragment;
use super::source::ImageSource;
use crate::metadata::ImageMetadata;
use crate::protocol::ImageInfoRequest;
use std::path::Path;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

const LOADING_TEXT: &str = "Waiting for image data...";

/// Front-end half of the widget.
///
/// Tracks which image is on screen, asks the helper about new ones and
/// renders whatever it last heard back. Results for an image that is no
/// longer tracked are dropped.
pub struct DisplayAgent {
    config: DisplayConfig,
    requests: UnboundedSender<ImageInfoRequest>,
    last_src: Option<String>,
    filename: String,
    info: Option<ImageMetadata>,
}

impl DisplayAgent {
    pub fn new(config: DisplayConfig, requests: UnboundedSender<ImageInfoRequest>) -> Self {
        info!(selector = %config.wallpaper_selector, "Starting image info display");
        Self {
            config,
            requests,
            last_src: None,
            filename: String::new(),
            info: None,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Filename of the image currently tracked.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The last applied result.
    pub fn info(&self) -> Option<&ImageMetadata> {
        self.info.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.info.is_some()
    }

    /// Polls the tracked element. Returns `true` when its source changed and
    /// a request went out.
    pub fn on_tick(&mut self, source: &impl ImageSource) -> bool {
        let Some(src) = source.image_src(&self.config.wallpaper_selector) else {
            debug!(selector = %self.config.wallpaper_selector, "Wallpaper image not found yet");
            return false;
        };
        if src.is_empty() || self.last_src.as_deref() == Some(src.as_str()) {
            return false;
        }

        info!(src = %src, "Image source changed");
        let request = ImageInfoRequest {
            path: path_from_src(&src),
            filename: filename_from_src(&src),
            local_path: None,
        };
        self.last_src = Some(src);
        self.track(request);
        true
    }

    /// Push-style variant of [`Self::on_tick`] for wallpaper modules that
    /// announce the new file themselves.
    pub fn on_wallpaper_changed(&mut self, path: &Path) {
        let src = path.to_string_lossy().into_owned();
        if self.last_src.as_deref() == Some(src.as_str()) {
            return;
        }
        info!(path = %path.display(), "Wallpaper changed");
        let request = ImageInfoRequest::for_path(path);
        self.last_src = Some(src);
        self.track(request);
    }

    fn track(&mut self, mut request: ImageInfoRequest) {
        request.local_path =
            local_path_guess(self.config.image_directory.as_deref(), &request.filename);
        self.filename = request.filename.clone();
        if self.requests.send(request).is_err() {
            warn!(filename = %self.filename, "Metadata helper is gone, request dropped");
        }
    }

    /// Applies a helper result if it is about the tracked image. Returns
    /// `true` when the display should be re-rendered.
    pub fn on_metadata_result(&mut self, result: ImageMetadata) -> bool {
        if result.filename.is_empty() || result.filename != self.filename {
            debug!(
                received = %result.filename,
                tracked = %self.filename,
                "Dropping stale image info"
            );
            return false;
        }
        debug!(filename = %result.filename, "Received image info");
        self.info = Some(result);
        true
    }

    pub fn render(&self) -> Fragment {
        let Some(info) = &self.info else {
            return Fragment::element("div", "dimmed light small")
                .with_child(Fragment::text(LOADING_TEXT));
        };

        let mut wrapper = Fragment::element("div", "image-info");
        if !self.config.header_text.is_empty() {
            wrapper.push(
                Fragment::element("header", "")
                    .with_child(Fragment::Raw(self.config.header_text.clone())),
            );
        }

        let mut inline = Fragment::element("div", "image-info-inline");
        for field in self.config.visible_fields() {
            let (class, text) = match field {
                Field::FileName => ("image-filename", Some(info.filename.clone())),
                Field::CreationDate => (
                    "image-date",
                    info.creation_date
                        .as_ref()
                        .and_then(|date| format_date(date, &self.config.date_format)),
                ),
                Field::Location => (
                    "image-location",
                    info.location
                        .as_ref()
                        .and_then(|loc| format_location(&self.config.location_format, loc)),
                ),
            };
            let Some(text) = text.filter(|t| !t.is_empty()) else {
                continue;
            };
            if !inline.children().is_empty() && !self.config.separator.is_empty() {
                inline.push(
                    Fragment::element("span", "image-info-separator")
                        .with_child(Fragment::text(self.config.separator.clone())),
                );
            }
            inline.push(Fragment::element("span", class).with_child(Fragment::text(text)));
        }

        let mut container = Fragment::element("div", self.config.text_class.clone());
        if !inline.children().is_empty() {
            container.push(inline);
        }
        wrapper.with_child(container)
    }
}
