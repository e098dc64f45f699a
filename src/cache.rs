//! On-disk cache of processed images.
//!
//! Every processed source image owns one directory under the cache root,
//! holding its feature record and its resized variants:
//!
//! ```text
//! {cache}/{config_hash}-{basename}-{source_hash}/
//!   index.json                 # Feature record
//!   {basename}-{width}{ext}    # one per generated width
//! ```
//!
//! # Design
//!
//! The directory name is the cache key. `config_hash` covers every processor
//! parameter, so changing the kernel, gamma, widths, or GPS policy lands in a
//! fresh directory and leaves the old one untouched. `source_hash` covers the
//! source path relative to the configured root (see [`crate::hashing`]).
//! The basename is only there to make the directory listing readable.
//!
//! Identity is path-based: editing a source in place keeps its cache entry.
//! Pass `--clear` or `--force` to regenerate.
//!
//! ## Feature file writes
//!
//! `index.json` is written to a temporary sibling and renamed into place, so
//! a reader never sees a half-written record. There is no lock file: two
//! processes racing on the same entry each rename a complete record and the
//! last rename wins. A record that exists but fails to parse is treated as a
//! miss and regenerated.

use crate::types::Feature;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the feature record within a cache entry.
pub const FEATURE_FILENAME: &str = "index.json";

/// One image's cache directory and the names inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// `{config_hash}-{basename}-{source_hash}`
    pub name: String,
    /// Absolute (or root-relative) path of the entry directory.
    pub dir: PathBuf,
    /// Source file stem.
    pub basename: String,
    /// Source extension including the dot, case preserved; empty if none.
    pub extension: String,
}

impl CacheEntry {
    pub fn new(cache_root: &Path, config_hash: &str, source: &Path, source_hash: &str) -> Self {
        let basename = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let name = format!("{config_hash}-{basename}-{source_hash}");
        Self {
            dir: cache_root.join(&name),
            name,
            basename,
            extension,
        }
    }

    pub fn feature_file(&self) -> PathBuf {
        self.dir.join(FEATURE_FILENAME)
    }

    /// `{basename}-{width}{ext}`
    pub fn variant_filename(&self, width: u32) -> String {
        format!("{}-{}{}", self.basename, width, self.extension)
    }

    pub fn variant_path(&self, width: u32) -> PathBuf {
        self.dir.join(self.variant_filename(width))
    }

    /// Variant address relative to the cache root, always `/`-separated.
    pub fn asset_href(&self, width: u32) -> String {
        format!("{}/{}", self.name, self.variant_filename(width))
    }
}

/// Read a cached feature record.
///
/// Returns `None` when the file is absent. A file that exists but cannot be
/// read or parsed is logged and also returns `None`, so the caller
/// regenerates it.
pub fn read_feature(path: &Path) -> Option<Feature> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable feature file, regenerating");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(feature) => Some(feature),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt feature file, regenerating");
            None
        }
    }
}

/// Write a feature record atomically (temporary sibling + rename).
pub fn write_feature(path: &Path, feature: &Feature) -> io::Result<()> {
    let json = serde_json::to_string(feature)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FEATURE_FILENAME.to_string());
    let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp);
    })
}

/// Summary of cache behavior for a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
    pub failures: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn fail(&mut self) {
        self.failures += 1;
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} processed ({} total)",
                self.hits,
                self.misses,
                self.hits + self.misses
            )?;
        } else {
            write!(f, "{} processed", self.misses)?;
        }
        if self.failures > 0 {
            write!(f, ", {} failed", self.failures)?;
        }
        Ok(())
    }
}
