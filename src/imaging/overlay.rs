//! Diagnostic dimension stamp for generated variants.
//!
//! When `GALLERIST_DEBUG` is set, each variant gets its `WIDTHxHEIGHT`
//! drawn in the center with a 3×5 bitmap font on a black plate, so the
//! width the browser picked from a `srcset` is visible on the page.

use image::{Rgba, RgbaImage};

/// Environment variable that enables the overlay.
pub const DEBUG_ENV: &str = "GALLERIST_DEBUG";

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;

/// Whether variant generation should stamp dimensions.
pub fn debug_overlay_enabled() -> bool {
    std::env::var_os(DEBUG_ENV).is_some_and(|v| !v.is_empty() && v != "0")
}

/// Rows of a glyph, top to bottom, three bits each (MSB = left column).
fn glyph(c: char) -> Option<[u8; 5]> {
    Some(match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'x' => [0b000, 0b101, 0b010, 0b101, 0b000],
        _ => return None,
    })
}

/// Draw `text` centered on `img`. Unknown characters render as blanks.
///
/// The glyph scale grows with the image so the label stays legible on large
/// variants; if the label cannot fit at scale 1 nothing is drawn.
pub fn draw_label(img: &mut RgbaImage, text: &str) {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return;
    }
    let (width, height) = img.dimensions();
    // one column of spacing between glyphs, one glyph-unit of padding around
    let units_w = chars * (GLYPH_WIDTH + 1) + 1;
    let units_h = GLYPH_HEIGHT + 2;
    let scale = (width / 4 / units_w).max(1);
    let (plate_w, plate_h) = (units_w * scale, units_h * scale);
    if plate_w > width || plate_h > height {
        return;
    }

    let left = (width - plate_w) / 2;
    let top = (height - plate_h) / 2;
    fill_rect(img, left, top, plate_w, plate_h, Rgba([0, 0, 0, 255]));

    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let glyph_left = left + (1 + i as u32 * (GLYPH_WIDTH + 1)) * scale;
        let glyph_top = top + scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    fill_rect(
                        img,
                        glyph_left + col * scale,
                        glyph_top + row as u32 * scale,
                        scale,
                        scale,
                        Rgba([255, 255, 255, 255]),
                    );
                }
            }
        }
    }
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}
