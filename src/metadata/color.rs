//! Average color extraction.
//!
//! The average is taken in "square-root" space: the square root of the
//! alpha-weighted mean of squared channel values. This keeps bright regions
//! from being washed out the way a plain arithmetic mean would. Fully
//! transparent pixels carry zero weight.

use crate::types::AverageColor;
use image::DynamicImage;

/// Average `[r, g, b]` of an image. Fully transparent images average to black.
pub fn average_rgb(img: &DynamicImage) -> [u8; 3] {
    let rgba = img.to_rgba8();
    let mut totals = [0u64; 3];
    let mut alpha_total = 0u64;

    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u64;
        if alpha == 0 {
            continue;
        }
        for (total, channel) in totals.iter_mut().zip([r, g, b]) {
            let c = channel as u64;
            *total += c * c * alpha;
        }
        alpha_total += alpha;
    }

    if alpha_total == 0 {
        return [0, 0, 0];
    }
    totals.map(|total| ((total as f64 / alpha_total as f64).sqrt().round()) as u8)
}

/// Perceived brightness below the midpoint (ITU-R BT.601 luma weights).
pub fn is_dark([r, g, b]: [u8; 3]) -> bool {
    let luma = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) as f64 / 1000.0;
    luma < 128.0
}

/// `#rrggbb`
pub fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Average color of a decoded image with its dark/light classification.
pub fn average_color(img: &DynamicImage) -> AverageColor {
    let rgb = average_rgb(img);
    AverageColor {
        hex: to_hex(rgb),
        is_dark: is_dark(rgb),
    }
}
