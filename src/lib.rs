//! # Gallerist
//!
//! Image ingestion, caching, and responsive gallery layout for static site
//! generators. Point it at a directory of photos and it produces, per image,
//! a GeoJSON-like feature record (EXIF, GPS, aspect ratio, blurhash, average
//! color) plus resized variants for `srcset`, all cached on disk.
//!
//! # Architecture: Two Cores
//!
//! ```text
//! 1. Ingest   source image  →  {cache}/{config_hash}-{name}-{source_hash}/
//!                              index.json + {name}-{width}{ext} per width
//! 2. Layout   features      →  justified rows | waterfall columns | wall
//! ```
//!
//! Ingestion is memoized by `(source_hash, config_hash)`: a warm cache costs
//! one JSON read per image and never decodes pixels. Layout is pure geometry
//! over aspect ratios and runs wherever the gallery is rendered.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`process`] | Orchestrator: cache lookup, parallel extraction, feature record write, batch driver |
//! | [`imaging`] | Pixel work behind the [`imaging::ImageBackend`] trait: identify, resize, variants |
//! | [`metadata`] | Extractors: EXIF/GPS, blurhash, average color, substitution tables |
//! | [`cache`] | Cache entry layout, atomic feature record writes, cache statistics |
//! | [`hashing`] | Source path and processor config digests (SHAKE256) |
//! | [`layout`] | Justified and waterfall layout engines |
//! | [`view`] | Feature → view model (`srcset`, `sizes`, placeholder) |
//! | [`config`] | `.gallerist.toml` discovery, merging over stock defaults, validation |
//! | [`types`] | Serialized records: `Feature`, `GeoPoint`, `Asset`, EXIF properties |
//! | [`scan`] | Source discovery for batch runs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Path-Based Identity
//!
//! The source hash covers the path relative to the configured root, not the
//! file content. Hashing content would mean reading every image on every
//! run. Editing a photo in place therefore keeps its cache entry; `--clear`
//! or `--force` regenerates it.
//!
//! ## Config in the Cache Key
//!
//! Every processor parameter (kernel, gamma, widths, GPS policy) feeds the
//! config hash, which prefixes the entry directory. Changing any of them
//! lands in a fresh directory instead of mixing variants produced under
//! different settings.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resizing, and encoding use the `image` crate; EXIF comes from
//! `kamadak-exif`. No system libraries are needed.

pub mod cache;
pub mod config;
pub mod hashing;
pub mod imaging;
pub mod layout;
pub mod metadata;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
