//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Identify | `image::image_dimensions` (header only) |
//! | EXIF / GPS | `kamadak-exif` via [`metadata::exif`](crate::metadata::exif) |
//! | Average color | [`metadata::color`](crate::metadata::color) |
//! | Blurhash | `DynamicImage::resize` (fit inside) + [`metadata::blurhash`](crate::metadata::blurhash) |
//! | Resize | `image::imageops::resize` with the configured kernel, optional gamma |
//! | Encode | `image` encoder picked from the output extension |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::overlay;
use super::params::ResizeParams;
use crate::config::ExifConfig;
use crate::metadata::{self, BlurhashOptions};
use crate::types::{AverageColor, ExifItem};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba32FImage};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
///
/// AVIF is not listed: the `image` crate cannot decode it without a C library.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let decode_error = |message: String| BackendError::Decode {
        path: path.to_path_buf(),
        message,
    };
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_error(e.to_string()))
}

/// Resize `img` to exactly `width`×`height`, optionally in linear light.
///
/// With a gamma, channel values are raised to `gamma` before resampling and
/// to `1/gamma` afterwards. Alpha is left linear.
fn resize_image(
    img: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
    gamma: Option<f32>,
) -> DynamicImage {
    let Some(gamma) = gamma else {
        return img.resize_exact(width, height, filter);
    };

    let mut linear: Rgba32FImage = img.to_rgba32f();
    apply_gamma(&mut linear, gamma);
    let mut resized = imageops::resize(&linear, width, height, filter);
    apply_gamma(&mut resized, 1.0 / gamma);

    let resized = DynamicImage::ImageRgba32F(resized);
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(resized.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    }
}

fn apply_gamma(img: &mut Rgba32FImage, exponent: f32) {
    for pixel in img.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = channel.max(0.0).powf(exponent);
        }
    }
}

/// Save an image, choosing the encoder from the output extension.
///
/// Output is normalized to 8-bit RGB(A); JPEG drops alpha.
fn save_image(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = match ext.as_str() {
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
        "tif" | "tiff" => ImageFormat::Tiff,
        "webp" => ImageFormat::WebP,
        other => {
            return Err(BackendError::ProcessingFailed(format!(
                "Unsupported output format: {}",
                other
            )));
        }
    };

    let normalized = if format == ImageFormat::Jpeg || !img.color().has_alpha() {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        DynamicImage::ImageRgba8(img.to_rgba8())
    };
    normalized.save_with_format(path, format).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to write {}: {}", path.display(), e))
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|e| BackendError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Dimensions { width, height })
    }

    fn read_exif(&self, path: &Path, config: &ExifConfig) -> Result<ExifItem, BackendError> {
        Ok(metadata::exif::read_exif(path, config)?)
    }

    fn average_color(&self, path: &Path) -> Result<AverageColor, BackendError> {
        let img = load_image(path)?;
        Ok(metadata::color::average_color(&img))
    }

    fn generate_blurhash(
        &self,
        path: &Path,
        options: &BlurhashOptions,
    ) -> Result<String, BackendError> {
        let img = load_image(path)?;
        let small = img
            .resize(options.width, options.height, FilterType::Triangle)
            .to_rgba8();
        Ok(metadata::blurhash::encode(
            &small,
            options.components_x,
            options.components_y,
        )?)
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let mut resized = resize_image(
            &img,
            params.width,
            params.height,
            params.kernel.filter(),
            params.gamma,
        );

        if params.debug_overlay {
            let mut rgba = resized.to_rgba8();
            overlay::draw_label(&mut rgba, &format!("{}x{}", params.width, params.height));
            resized = DynamicImage::ImageRgba8(rgba);
        }

        save_image(&resized, &params.output)
    }
}
