//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines every operation the pipeline needs
//! from a source image: identify, read_exif, average_color,
//! generate_blurhash, and resize.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust, statically
//! linked. Tests use the recording `MockBackend` below.

use super::params::ResizeParams;
use crate::config::ExifConfig;
use crate::metadata::{BlurhashOptions, ExifError};
use crate::metadata::blurhash::BlurhashError;
use crate::types::{AverageColor, ExifItem};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("EXIF error: {0}")]
    Exif(#[from] ExifError),
    #[error("Blurhash error: {0}")]
    Blurhash(#[from] BlurhashError),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// All methods only read the source file (resize also writes its output), so
/// implementations must tolerate concurrent calls on the same path.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Read EXIF properties and GPS geometry.
    fn read_exif(&self, path: &Path, config: &ExifConfig) -> Result<ExifItem, BackendError>;

    /// Average color of the whole image.
    fn average_color(&self, path: &Path) -> Result<AverageColor, BackendError>;

    /// Blurhash placeholder of the image shrunk into the options' bounding box.
    fn generate_blurhash(
        &self,
        path: &Path,
        options: &BlurhashOptions,
    ) -> Result<String, BackendError>;

    /// Execute a resize operation.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
