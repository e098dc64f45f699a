//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Select the variant widths to generate for a source image.
///
/// Keeps configured widths that do not exceed the source width (variants
/// never upscale), in configured order. Repeated widths are kept once so
/// that no two concurrent writers target the same file.
///
/// # Examples
/// ```
/// # use gallerist::imaging::calculate_variant_widths;
/// assert_eq!(calculate_variant_widths(&[640, 1280, 2560], 1500), vec![640, 1280]);
/// assert_eq!(calculate_variant_widths(&[640, 640], 800), vec![640]);
/// ```
pub fn calculate_variant_widths(requested: &[u32], source_width: u32) -> Vec<u32> {
    let mut widths: Vec<u32> = Vec::with_capacity(requested.len());
    for &width in requested {
        if width > 0 && width <= source_width && !widths.contains(&width) {
            widths.push(width);
        }
    }
    widths
}

/// Height of a variant resized to `width`, preserving the source aspect ratio.
///
/// Never returns 0: a sliver-thin source still produces a one-pixel row.
pub fn calculate_variant_height(source: Dimensions, width: u32) -> u32 {
    if source.width == 0 {
        return 1;
    }
    let height = source.height as f64 * width as f64 / source.width as f64;
    (height.round() as u32).max(1)
}

/// Source aspect ratio (width / height).
pub fn aspect_ratio(source: Dimensions) -> f64 {
    source.width as f64 / source.height as f64
}
