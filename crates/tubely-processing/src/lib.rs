//! Tubely Processing Library
//!
//! The local, pre-upload stages of media ingestion:
//!
//! - [`UploadValidator`] checks the declared content type and size before any I/O
//! - [`StagingArea`] buffers a body to a temporary file that is removed on drop
//! - [`Prober`] reads stream geometry (ffprobe)
//! - [`classify`] maps geometry to an [`AspectClass`](tubely_core::AspectClass)
//! - [`Remuxer`] relocates container metadata for progressive playback (ffmpeg)

pub mod aspect;
pub mod faststart;
pub mod probe;
pub mod staging;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod validator;

pub use aspect::classify;
pub use faststart::{FfmpegRemuxer, Remuxer};
pub use probe::{FfprobeProber, ProbeResult, Prober};
pub use staging::{StagedFile, StagingArea};
pub use validator::{UploadValidator, ValidatedUpload};
