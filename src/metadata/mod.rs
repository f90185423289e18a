//! Resolving the creation date and location of an image file.
//!
//! Sources are tried in a fixed order: `exiftool` (when installed), the
//! in-process Exif parser, then filesystem timestamps.
pub mod error;
mod exif_parser;
mod exiftool_reader;
mod filesystem;
pub mod parsing;
pub mod resolver;
pub mod structs;

pub use resolver::{MetadataResolver, ToolAvailability};
pub use structs::{DateSource, FileTimeKind, ImageMetadata, Location};
