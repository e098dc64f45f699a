//! The processor: one source image in, one cached feature record out.
//!
//! ## Algorithm
//!
//! 1. Validate the processor config and compute its hash.
//! 2. Hash the source path relative to `base.root`.
//! 3. Derive the cache entry `{config_hash}-{basename}-{source_hash}` under
//!    `base.cache`; the feature record is `index.json` inside it.
//! 4. **Cache hit**: the record exists and neither `clear` nor
//!    `force_overwrite` is set. Parse it and return. No image is decoded and
//!    no extractor runs, so a warm cache costs one file read per image.
//! 5. **Cache miss**: run EXIF extraction, blurhash generation, color
//!    extraction, and variant generation concurrently (the variant generator
//!    also reports the native dimensions). Assemble the feature, null the
//!    geometry when `strip_gps` is set, and write the record.
//!
//! Any extractor failure aborts the call before the record is written, so a
//! failed call leaves no readable entry behind and can simply be retried.
//!
//! ## Parallel Processing
//!
//! The four extractors run on the [rayon](https://docs.rs/rayon) pool via
//! nested `rayon::join`. [`process_all`] additionally processes many sources
//! in parallel; one failing source does not stop the others.

use crate::cache::{CacheEntry, CacheStats, read_feature, write_feature};
use crate::config::{BaseConfig, Config, ConfigError, ExifConfig, ProcessorConfig};
use crate::hashing::{config_hash, source_file_hash};
use crate::imaging::{
    BackendError, ImageBackend, RustBackend, VariantError, VariantRequest, aspect_ratio,
    generate_image_variants,
};
use crate::metadata::BlurhashOptions;
use crate::types::{Asset, Feature, FeatureProperties, FeatureType};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info_span, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Invalid processor config: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to process {}: {source}", path.display())]
    Source { path: PathBuf, source: BackendError },
    #[error("Cache write failed for {} at {}: {source}", source_file.display(), path.display())]
    Cache {
        source_file: PathBuf,
        path: PathBuf,
        source: io::Error,
    },
}

/// Inputs for processing one source image.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRequest<'a> {
    pub base: &'a BaseConfig,
    pub processor: &'a ProcessorConfig,
    pub exif: &'a ExifConfig,
    pub source_file: &'a Path,
    /// Delete and regenerate the whole cache entry.
    pub clear: bool,
    /// Regenerate variants and rewrite the feature record.
    pub force_overwrite: bool,
}

/// Output of [`process`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorResult {
    pub feature_file: PathBuf,
    pub feature: Feature,
    /// `true` when the record came straight from the cache.
    pub cached: bool,
    /// Variant files written by this call.
    pub generated: usize,
}

/// Process one source image with the production backend.
pub fn process(request: &ProcessRequest) -> Result<ProcessorResult, ProcessError> {
    process_with_backend(&RustBackend::new(), request)
}

/// Process one source image. See the [module docs](self) for the algorithm.
pub fn process_with_backend(
    backend: &impl ImageBackend,
    request: &ProcessRequest,
) -> Result<ProcessorResult, ProcessError> {
    let source_file = request.source_file;
    let span = info_span!("process", source = %source_file.display());
    let _guard = span.enter();

    request.processor.validate()?;
    let config_hash = config_hash(request.processor);
    let source_hash = source_file_hash(&request.base.root, source_file);
    let entry = CacheEntry::new(&request.base.cache, &config_hash, source_file, &source_hash);
    let feature_file = entry.feature_file();

    if !request.clear
        && !request.force_overwrite
        && let Some(feature) = read_feature(&feature_file)
    {
        debug!(entry = %entry.name, "cache hit");
        return Ok(ProcessorResult {
            feature_file,
            feature,
            cached: true,
            generated: 0,
        });
    }
    debug!(entry = %entry.name, "cache miss");

    let variant_request = VariantRequest {
        source: source_file,
        entry: &entry,
        config: request.processor,
        clear: request.clear,
        force_overwrite: request.force_overwrite,
    };
    let ((exif, blurhash), (color, variants)) = rayon::join(
        || {
            rayon::join(
                || backend.read_exif(source_file, request.exif),
                || backend.generate_blurhash(source_file, &BlurhashOptions::default()),
            )
        },
        || {
            rayon::join(
                || backend.average_color(source_file),
                || generate_image_variants(backend, &variant_request),
            )
        },
    );

    let source_error = |source: BackendError| ProcessError::Source {
        path: source_file.to_path_buf(),
        source,
    };
    let cache_error = |path: PathBuf, source: io::Error| ProcessError::Cache {
        source_file: source_file.to_path_buf(),
        path,
        source,
    };
    let variants = variants.map_err(|e| match e {
        VariantError::CacheDir { path, source } => cache_error(path, source),
        VariantError::Backend(source) => source_error(source),
    })?;
    let exif = exif.map_err(source_error)?;
    let blurhash = blurhash.map_err(source_error)?;
    let average_color = color.map_err(source_error)?;

    // Privacy gate: GPS is always parsed, stripping is the final filter
    let geometry = if request.processor.strip_gps {
        None
    } else {
        exif.geometry
    };

    let feature = Feature {
        kind: FeatureType::Feature,
        id: source_hash,
        geometry,
        properties: FeatureProperties {
            exif: exif.properties,
            aspect_ratio: aspect_ratio(variants.source),
            blurhash,
            average_color,
        },
        assets: variants
            .variants
            .iter()
            .map(|v| Asset {
                href: entry.asset_href(v.width),
                width: v.width,
            })
            .collect(),
    };

    write_feature(&feature_file, &feature)
        .map_err(|source| cache_error(feature_file.clone(), source))?;

    Ok(ProcessorResult {
        feature_file,
        feature,
        cached: false,
        generated: variants.generated,
    })
}

/// Flags applied to every source in a batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub clear: bool,
    pub force_overwrite: bool,
}

/// Outcome of one source in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub source: PathBuf,
    pub result: Result<ProcessorResult, ProcessError>,
}

/// Outcomes in input order plus cache statistics.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
    pub stats: CacheStats,
}

impl BatchReport {
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| &r.feature)
    }

    pub fn has_failures(&self) -> bool {
        self.stats.failures > 0
    }
}

/// Process every source in parallel.
///
/// Failures are logged and counted but do not abort the batch; retrying a
/// failed source is safe because a failed call writes no feature record.
pub fn process_all(
    backend: &impl ImageBackend,
    config: &Config,
    sources: &[PathBuf],
    options: BatchOptions,
) -> BatchReport {
    let outcomes: Vec<BatchOutcome> = sources
        .par_iter()
        .map(|source| {
            let request = ProcessRequest {
                base: &config.base,
                processor: &config.processor,
                exif: &config.exif,
                source_file: source,
                clear: options.clear,
                force_overwrite: options.force_overwrite,
            };
            let result = process_with_backend(backend, &request);
            if let Err(e) = &result {
                warn!(source = %source.display(), error = %e, "processing failed");
            }
            BatchOutcome {
                source: source.clone(),
                result,
            }
        })
        .collect();

    let mut stats = CacheStats::default();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(r) if r.cached => stats.hit(),
            Ok(_) => stats.miss(),
            Err(_) => stats.fail(),
        }
    }

    BatchReport { outcomes, stats }
}
