//! Data models for the application
//!
//! The pipeline only ever reads a [`VideoAsset`] and rewrites its URL fields;
//! the other types are derived per request and never stored on their own.

mod media;
mod thumbnail;
mod video;

pub use media::{AspectClass, MediaKind};
pub use thumbnail::Thumbnail;
pub use video::VideoAsset;
