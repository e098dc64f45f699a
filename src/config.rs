//! Configuration loading, defaults, and validation.
//!
//! Configuration lives in a `.gallerist.toml` file. The loader walks up from
//! the starting directory and uses the first file it finds, so a single file
//! at the project root covers every subdirectory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [base]
//! root = "."                 # Source root; cache keys hash paths relative to it
//! cache = ".gallerist"       # Cache root for feature records and variants
//! namespace = "@gallerist"   # Import namespace used by the build integration
//!
//! [processor]
//! resize_kernel = "lanczos3" # nearest | linear | cubic | gaussian | lanczos3
//! # resize_gamma = 2.2       # Linear-light resampling (1.0-3.0), off when absent
//! variants = [640, 768, 1280, 1920, 2560]
//! strip_gps = false          # Drop GPS geometry from feature records
//!
//! [exif]
//! warn_on_unknown_make = true
//! warn_on_unknown_model = true
//! warn_on_unknown_lens = true
//!
//! [exif.make_map]
//! "NIKON CORPORATION" = "Nikon"
//!
//! [gallery]
//! mode = "wall"              # wall | waterfall | justified
//! target_row_height = 300.0
//! gap = 8.0
//! panorama_threshold = 3.0
//!
//! [gallery.column_breakpoints]
//! 640 = 2
//! 768 = 3
//! 1024 = 4
//!
//! [processing]
//! max_processes = 4          # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Files are sparse: user values are merged over the stock defaults, unknown
//! keys are rejected to catch typos early, and the merged result is validated
//! before anything touches the filesystem.
//!
//! `base.root` and `base.cache` are resolved relative to the directory that
//! contains the config file.

use crate::metadata::lookup::{default_lens_map, default_make_map, default_model_map};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file searched for by [`load_config`].
pub const CONFIG_FILENAME: &str = ".gallerist.toml";

/// Name of the cache directory used when no config overrides it.
pub const DEFAULT_CACHE_DIR: &str = ".gallerist";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete configuration as loaded from `.gallerist.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Filesystem roots.
    pub base: BaseConfig,
    /// Variant generation parameters. Part of every cache key.
    pub processor: ProcessorConfig,
    /// EXIF substitution tables.
    pub exif: ExifConfig,
    /// Gallery layout defaults.
    pub gallery: GalleryConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Config {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.processor.validate()?;
        self.gallery.validate()?;
        Ok(())
    }
}

/// Source and cache roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaseConfig {
    /// Source root. Source hashes are computed from paths relative to it.
    pub root: PathBuf,
    /// Cache root. Each processed image gets one subdirectory here.
    pub cache: PathBuf,
    /// Module namespace the build integration serves features under.
    pub namespace: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            cache: PathBuf::from(DEFAULT_CACHE_DIR),
            namespace: "@gallerist".to_string(),
        }
    }
}

impl BaseConfig {
    /// Base config rooted at `dir`, with the cache in `dir/.gallerist`.
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            root: dir.to_path_buf(),
            cache: dir.join(DEFAULT_CACHE_DIR),
            ..Self::default()
        }
    }
}

/// Resampling filter used for variant generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeKernel {
    Nearest,
    Linear,
    Cubic,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResizeKernel {
    /// The `image` crate filter implementing this kernel.
    pub fn filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Linear => FilterType::Triangle,
            Self::Cubic => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

pub const MIN_GAMMA: f32 = 1.0;
pub const MAX_GAMMA: f32 = 3.0;

/// Variant generation parameters.
///
/// The canonical JSON of this struct is hashed into every cache key (see
/// [`crate::hashing::config_hash`]), so changing any field invalidates
/// previously generated variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Resampling filter.
    pub resize_kernel: ResizeKernel,
    /// Gamma used for linear-light resampling. `None` resizes in stored space.
    pub resize_gamma: Option<f32>,
    /// Target widths in pixels. Widths above the source width are skipped.
    pub variants: Vec<u32>,
    /// Null out GPS geometry in feature records.
    pub strip_gps: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            resize_kernel: ResizeKernel::default(),
            resize_gamma: None,
            variants: vec![640, 768, 1280, 1920, 2560],
            strip_gps: false,
        }
    }
}

impl ProcessorConfig {
    /// Validate value ranges. Called before any I/O by the processor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(gamma) = self.resize_gamma
            && !(MIN_GAMMA..=MAX_GAMMA).contains(&gamma)
        {
            return Err(ConfigError::Validation(format!(
                "processor.resize_gamma must be between {MIN_GAMMA} and {MAX_GAMMA}, got {gamma}"
            )));
        }
        if self.variants.contains(&0) {
            return Err(ConfigError::Validation(
                "processor.variants must be positive widths".into(),
            ));
        }
        Ok(())
    }
}

/// EXIF substitution tables and warning switches.
///
/// Tables map raw camera strings (exact match) to display names. Unmapped
/// values pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExifConfig {
    pub make_map: BTreeMap<String, String>,
    pub model_map: BTreeMap<String, String>,
    pub lens_map: BTreeMap<String, String>,
    pub warn_on_unknown_make: bool,
    pub warn_on_unknown_model: bool,
    pub warn_on_unknown_lens: bool,
}

impl Default for ExifConfig {
    fn default() -> Self {
        Self {
            make_map: default_make_map(),
            model_map: default_model_map(),
            lens_map: default_lens_map(),
            warn_on_unknown_make: true,
            warn_on_unknown_model: true,
            warn_on_unknown_lens: true,
        }
    }
}

/// Gallery presentation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GalleryMode {
    /// Uniform grid in source order, no geometry.
    #[default]
    Wall,
    /// Round-robin columns.
    Waterfall,
    /// Justified rows.
    Justified,
}

/// Gallery layout defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    pub mode: GalleryMode,
    /// Minimum container width (as a string key, TOML tables need string keys)
    /// to column count, for waterfall mode.
    pub column_breakpoints: BTreeMap<String, u32>,
    /// Target row height in pixels for justified mode.
    pub target_row_height: f64,
    /// Gap between images in pixels for justified mode.
    pub gap: f64,
    /// Aspect ratio above which an image gets its own justified row.
    pub panorama_threshold: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            mode: GalleryMode::default(),
            column_breakpoints: [("640", 2), ("768", 3), ("1024", 4)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            target_row_height: 300.0,
            gap: 8.0,
            panorama_threshold: 3.0,
        }
    }
}

impl GalleryConfig {
    /// Column breakpoints with numeric keys.
    pub fn breakpoints(&self) -> Result<BTreeMap<u32, u32>, ConfigError> {
        self.column_breakpoints
            .iter()
            .map(|(width, columns)| {
                let width: u32 = width.trim().parse().map_err(|_| {
                    ConfigError::Validation(format!(
                        "gallery.column_breakpoints key '{width}' is not a pixel width"
                    ))
                })?;
                Ok((width, *columns))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let breakpoints = self.breakpoints()?;
        if breakpoints.values().any(|&columns| columns == 0) {
            return Err(ConfigError::Validation(
                "gallery.column_breakpoints column counts must be positive".into(),
            ));
        }
        if !(self.target_row_height > 0.0) {
            return Err(ConfigError::Validation(
                "gallery.target_row_height must be positive".into(),
            ));
        }
        if !(self.gap >= 0.0) {
            return Err(ConfigError::Validation(
                "gallery.gap must not be negative".into(),
            ));
        }
        if !(self.panorama_threshold > 0.0) {
            return Err(ConfigError::Validation(
                "gallery.panorama_threshold must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Find `.gallerist.toml` in `start` or the nearest ancestor directory.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

/// Parse config text, merge it over the stock defaults, and validate.
///
/// The substitution tables are replaced wholesale rather than merged: a user
/// `[exif.make_map]` table is the complete make table.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let mut base = stock_defaults_value();
    if let (Some(base_exif), Some(overlay_exif)) = (
        base.get_mut("exif").and_then(toml::Value::as_table_mut),
        overlay.get("exif").and_then(toml::Value::as_table),
    ) {
        for table in ["make_map", "model_map", "lens_map"] {
            if overlay_exif.contains_key(table) {
                base_exif.remove(table);
            }
        }
    }
    let config: Config = merge_toml(base, overlay).try_into()?;
    config.validate()?;
    Ok(config)
}

/// A loaded config plus the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

/// Load the config that applies to `start`.
///
/// Walks up from `start` for a `.gallerist.toml`. Relative `base.root` and
/// `base.cache` values are resolved against the directory containing the
/// file. Without a file, the stock defaults apply with `start` as the root.
pub fn load_config(start: &Path) -> Result<LoadedConfig, ConfigError> {
    let Some(path) = find_config_file(start) else {
        let config = Config {
            base: BaseConfig::rooted_at(start),
            ..Config::default()
        };
        return Ok(LoadedConfig {
            config,
            source: None,
        });
    };

    let content = fs::read_to_string(&path)?;
    let mut config = parse_config(&content)?;
    let dir = path.parent().unwrap_or(start);
    config.base.root = dir.join(&config.base.root);
    config.base.cache = dir.join(&config.base.cache);
    Ok(LoadedConfig {
        config,
        source: Some(path),
    })
}

/// Returns a fully-commented stock `.gallerist.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallerist Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file applies to its directory and every directory below it.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Filesystem roots (relative paths resolve against this file's directory)
# ---------------------------------------------------------------------------
[base]
# Source root. Cache keys hash image paths relative to it.
root = "."

# Cache root. One subdirectory per processed image and processor config.
cache = ".gallerist"

# Namespace the build integration serves feature records under.
namespace = "@gallerist"

# ---------------------------------------------------------------------------
# Variant generation (any change here invalidates cached variants)
# ---------------------------------------------------------------------------
[processor]
# Resampling filter: nearest, linear, cubic, gaussian, lanczos3.
resize_kernel = "lanczos3"

# Gamma for linear-light resampling, between 1.0 and 3.0.
# Omit to resample in stored (sRGB) space.
# resize_gamma = 2.2

# Widths to generate. Widths larger than the source are skipped.
variants = [640, 768, 1280, 1920, 2560]

# Remove GPS coordinates from feature records.
strip_gps = false

# ---------------------------------------------------------------------------
# EXIF display names (exact match; a table here replaces the default table)
# ---------------------------------------------------------------------------
[exif]
warn_on_unknown_make = true
warn_on_unknown_model = true
warn_on_unknown_lens = true

[exif.make_map]
"Apple" = "Apple"
"Canon" = "Canon"
"NIKON CORPORATION" = "Nikon"
"RICOH IMAGING COMPANY, LTD." = "Ricoh"

[exif.model_map]
"Canon EOS M6 Mark II" = "Canon EOS M6 MkII"
"NIKON Z6_3" = "Nikon Z6 III"
"iPhone 15 Pro Max" = "Apple iPhone 15 Pro Max"
"RICOH GR IIIx" = "Ricoh GR IIIx"

[exif.lens_map]
"EF-M22mm f/2 STM" = "Canon EF-M 22mm f/2 STM"
"iPhone 15 Pro Max back camera 6.765mm f/1.78" = "iPhone 15 Pro Max 6.765mm f/1.78"
"NIKKOR Z 40mm f/2" = "Nikkor Z 40mm f/2"

# ---------------------------------------------------------------------------
# Gallery layout
# ---------------------------------------------------------------------------
[gallery]
# Layout mode: wall, waterfall, justified.
mode = "wall"

# Justified mode: preferred row height and gap in pixels.
target_row_height = 300.0
gap = 8.0

# Justified mode: images wider than this aspect ratio get their own row.
panorama_threshold = 3.0

# Waterfall mode: minimum container width -> column count.
[gallery.column_breakpoints]
640 = 2
768 = 3
1024 = 4

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
