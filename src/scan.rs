//! Source discovery for batch ingestion.
//!
//! Expands the paths given on the command line into the list of image files
//! to process:
//!
//! - A file path is taken as-is when its extension is supported.
//! - A directory is walked recursively. Dot-directories (`.git`, the default
//!   `.gallerist` cache) are skipped entirely, as are dot-files.
//! - The cache directory is never scanned, whatever its name, and files
//!   inside it are dropped even when named explicitly. Otherwise each run
//!   would pick up the previous run's variants as new sources.
//!
//! Supported extensions come from the image backend (see
//! [`supported_input_extensions`]) and match case-insensitively. The result
//! is sorted and deduplicated so batch output is deterministic.

use crate::imaging::supported_input_extensions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Path not found: {0}")]
    NotFound(PathBuf),
}

/// Whether `path` has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Whether `path` resolves to a location inside the (canonical) cache root.
fn is_in_cache(path: &Path, cache: Option<&Path>) -> bool {
    cache.is_some_and(|cache| {
        path.canonicalize()
            .is_ok_and(|resolved| resolved.starts_with(cache))
    })
}

/// Discover image files under `paths`, skipping everything under `cache`.
///
/// A cache directory that does not exist yet excludes nothing.
pub fn discover_images(paths: &[PathBuf], cache: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let cache = cache.canonicalize().ok();
    let cache = cache.as_deref();
    let mut found = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(ScanError::NotFound(path.clone()));
        }
        if path.is_file() {
            if is_supported_image(path) && !is_in_cache(path, cache) {
                found.push(path.clone());
            }
            continue;
        }

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                !is_hidden(e) && !(e.file_type().is_dir() && is_in_cache(e.path(), cache))
            })
        {
            let entry = entry?;
            if entry.file_type().is_file() && is_supported_image(entry.path()) {
                found.push(entry.into_path());
            }
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}
