//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`variants`](super::variants) generator (which
//! decides which files to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping
//! backends (e.g. for testing with a mock) without changing generator logic.

use crate::config::ResizeKernel;
use std::path::PathBuf;

/// Parameters for a single variant resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    /// Output file; the encoder is chosen from its extension.
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub kernel: ResizeKernel,
    /// Resample in linear light: raise to `gamma` before, `1/gamma` after.
    pub gamma: Option<f32>,
    /// Stamp `WIDTHxHEIGHT` onto the output.
    pub debug_overlay: bool,
}
