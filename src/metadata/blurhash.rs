//! Blurhash placeholder encoder.
//!
//! Encodes a small RGBA buffer into the compact base-83 string format used
//! by blurhash decoders on the client. The image is projected onto a grid of
//! cosine basis functions in linear light; the DC term carries the average
//! color and the AC terms are quantized against their shared maximum.
//!
//! ```text
//! [size flag: 1][max AC: 1][DC: 4][AC: 2 × (cx·cy − 1)]
//! ```

use image::RgbaImage;
use std::f64::consts::PI;
use thiserror::Error;

const BASE83: &[u8; 83] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz#$%*+,-.:;=?@[]^_{|}~";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlurhashError {
    #[error("blurhash components must be 1-9 per axis, got {x}x{y}")]
    ComponentsOutOfRange { x: u32, y: u32 },
    #[error("cannot encode an empty image")]
    EmptyImage,
}

/// Blurhash generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurhashOptions {
    pub components_x: u32,
    pub components_y: u32,
    /// Bounding box the source is resized into before encoding.
    pub width: u32,
    pub height: u32,
}

impl Default for BlurhashOptions {
    fn default() -> Self {
        Self {
            components_x: 4,
            components_y: 4,
            width: 100,
            height: 100,
        }
    }
}

fn encode83(value: u32, length: u32, out: &mut String) {
    for i in 1..=length {
        let digit = (value / 83u32.pow(length - i)) % 83;
        out.push(BASE83[digit as usize] as char);
    }
}

fn srgb_to_linear(value: u8) -> f64 {
    let v = value as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(value: f64) -> u32 {
    let v = value.clamp(0.0, 1.0);
    if v <= 0.003_130_8 {
        (v * 12.92 * 255.0 + 0.5) as u32
    } else {
        ((1.055 * v.powf(1.0 / 2.4) - 0.055) * 255.0 + 0.5) as u32
    }
}

fn sign_pow(value: f64, exp: f64) -> f64 {
    value.abs().powf(exp).copysign(value)
}

/// Project the image onto basis function `(cx, cy)`.
fn basis_factor(img: &RgbaImage, linear: &[[f64; 3]], cx: u32, cy: u32) -> [f64; 3] {
    let (width, height) = img.dimensions();
    let normalisation = if cx == 0 && cy == 0 { 1.0 } else { 2.0 };
    let mut sum = [0.0f64; 3];
    for y in 0..height {
        let cos_y = (PI * cy as f64 * y as f64 / height as f64).cos();
        for x in 0..width {
            let basis = normalisation * (PI * cx as f64 * x as f64 / width as f64).cos() * cos_y;
            let pixel = linear[(y * width + x) as usize];
            for (s, p) in sum.iter_mut().zip(pixel) {
                *s += basis * p;
            }
        }
    }
    let scale = 1.0 / (width as f64 * height as f64);
    sum.map(|s| s * scale)
}

fn encode_dc([r, g, b]: [f64; 3]) -> u32 {
    (linear_to_srgb(r) << 16) + (linear_to_srgb(g) << 8) + linear_to_srgb(b)
}

fn encode_ac(factor: [f64; 3], maximum: f64) -> u32 {
    let [r, g, b] = factor.map(|c| {
        (sign_pow(c / maximum, 0.5) * 9.0 + 9.5)
            .floor()
            .clamp(0.0, 18.0) as u32
    });
    r * 19 * 19 + g * 19 + b
}

/// Encode an RGBA image with a `components_x × components_y` basis grid.
///
/// The caller is expected to have shrunk the image already; cost is
/// proportional to pixels × components.
pub fn encode(
    img: &RgbaImage,
    components_x: u32,
    components_y: u32,
) -> Result<String, BlurhashError> {
    if !(1..=9).contains(&components_x) || !(1..=9).contains(&components_y) {
        return Err(BlurhashError::ComponentsOutOfRange {
            x: components_x,
            y: components_y,
        });
    }
    if img.width() == 0 || img.height() == 0 {
        return Err(BlurhashError::EmptyImage);
    }

    let linear: Vec<[f64; 3]> = img
        .pixels()
        .map(|p| [p.0[0], p.0[1], p.0[2]].map(srgb_to_linear))
        .collect();

    let mut factors = Vec::with_capacity((components_x * components_y) as usize);
    for cy in 0..components_y {
        for cx in 0..components_x {
            factors.push(basis_factor(img, &linear, cx, cy));
        }
    }
    let (dc, ac) = factors.split_first().ok_or(BlurhashError::EmptyImage)?;

    let mut hash = String::with_capacity(6 + ac.len() * 2);
    encode83((components_x - 1) + (components_y - 1) * 9, 1, &mut hash);

    let maximum = if ac.is_empty() {
        encode83(0, 1, &mut hash);
        1.0
    } else {
        let actual = ac
            .iter()
            .flat_map(|f| f.iter())
            .fold(0.0f64, |max, c| max.max(c.abs()));
        let quantised = (actual * 166.0 - 0.5).floor().clamp(0.0, 82.0) as u32;
        encode83(quantised, 1, &mut hash);
        (quantised + 1) as f64 / 166.0
    };

    encode83(encode_dc(*dc), 4, &mut hash);
    for factor in ac {
        encode83(encode_ac(*factor, maximum), 2, &mut hash);
    }
    Ok(hash)
}
