//! Variant generation: resized renditions of one source at the configured widths.
//!
//! For each configured width that does not exceed the source width, one file
//! named `{basename}-{width}{ext}` is written into the cache entry directory.
//! Existing files are kept unless `force_overwrite` is set, and `clear`
//! removes the whole entry directory first. Per-width writes target distinct
//! files and run in parallel.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_variant_height, calculate_variant_widths};
use super::overlay::debug_overlay_enabled;
use super::params::ResizeParams;
use crate::cache::CacheEntry;
use crate::config::ProcessorConfig;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum VariantError {
    #[error("Failed to prepare cache directory {}: {source}", path.display())]
    CacheDir { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// What to generate and where.
#[derive(Debug, Clone, Copy)]
pub struct VariantRequest<'a> {
    pub source: &'a Path,
    pub entry: &'a CacheEntry,
    pub config: &'a ProcessorConfig,
    /// Delete the entry directory before generating.
    pub clear: bool,
    /// Regenerate variants that already exist.
    pub force_overwrite: bool,
}

/// A variant file available in the cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedVariant {
    pub width: u32,
    pub path: PathBuf,
}

/// Result of [`generate_image_variants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
    /// Every available variant (new and pre-existing), in configured order.
    pub variants: Vec<GeneratedVariant>,
    /// Native dimensions of the source.
    pub source: Dimensions,
    /// How many files were written by this call.
    pub generated: usize,
}

/// Generate the variants for one source image.
///
/// Returns the source dimensions along with the variant list so callers do
/// not need a second metadata read.
pub fn generate_image_variants(
    backend: &impl ImageBackend,
    request: &VariantRequest,
) -> Result<VariantSet, VariantError> {
    let dir = &request.entry.dir;
    let cache_dir_error = |source: io::Error| VariantError::CacheDir {
        path: dir.clone(),
        source,
    };

    if request.clear && dir.exists() {
        std::fs::remove_dir_all(dir).map_err(cache_dir_error)?;
    }
    std::fs::create_dir_all(dir).map_err(cache_dir_error)?;

    let source = backend.identify(request.source)?;
    let widths = calculate_variant_widths(&request.config.variants, source.width);
    let debug_overlay = debug_overlay_enabled();

    let outcomes: Vec<(GeneratedVariant, bool)> = widths
        .par_iter()
        .map(|&width| {
            let path = request.entry.variant_path(width);
            if path.exists() && !request.force_overwrite {
                return Ok((GeneratedVariant { width, path }, false));
            }
            backend.resize(&ResizeParams {
                source: request.source.to_path_buf(),
                output: path.clone(),
                width,
                height: calculate_variant_height(source, width),
                kernel: request.config.resize_kernel,
                gamma: request.config.resize_gamma,
                debug_overlay,
            })?;
            Ok((GeneratedVariant { width, path }, true))
        })
        .collect::<Result<Vec<_>, BackendError>>()?;

    let generated = outcomes.iter().filter(|(_, written)| *written).count();
    debug!(
        source = %request.source.display(),
        available = outcomes.len(),
        generated,
        "variants ready"
    );

    Ok(VariantSet {
        variants: outcomes.into_iter().map(|(variant, _)| variant).collect(),
        source,
        generated,
    })
}
