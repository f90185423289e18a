//! # Mirror Image Info
//!
//! Show what is known about the wallpaper currently on a smart-mirror
//! dashboard: its filename, when it was taken and, optionally, where.
//!
//! The crate has two halves that talk over channels:
//!
//! - **Display agent** ([`display::DisplayAgent`]): polls the host for the
//!   `src` of the wallpaper image, asks for metadata when it changes, drops
//!   answers about images that are no longer shown, and renders a small
//!   HTML fragment.
//! - **Metadata helper** ([`helper::spawn_helper`]): wraps a
//!   [`metadata::MetadataResolver`] which tries `exiftool`, then the Exif block
//!   embedded in the file, then filesystem timestamps. It always answers, even
//!   if all it knows is the filename.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mirror_image_info::display::{DisplayConfig, FileImageSource, run_widget};
//! use mirror_image_info::metadata::MetadataResolver;
//!
//! #[tokio::main]
//! async fn main() {
//!     let resolver = MetadataResolver::builder().include_location(true).build();
//!     let config = DisplayConfig {
//!         show_location: true,
//!         ..DisplayConfig::default()
//!     };
//!     let source = FileImageSource::new("/run/wallpaper/current");
//!
//!     run_widget(config, source, resolver, |fragment| {
//!         println!("{}", fragment.to_html());
//!     })
//!     .await;
//! }
//! ```

pub mod display;
mod error;
pub mod helper;
pub mod install_check;
pub mod metadata;
pub mod protocol;

pub use error::ImageInfoError;
pub use metadata::{ImageMetadata, Location, MetadataResolver};
pub use protocol::{ImageInfoRequest, Notification};
