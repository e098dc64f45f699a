//! Image processing: pure Rust, no external binaries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **EXIF** | `kamadak-exif` |
//! | **Color / blurhash** | decode + [`metadata`](crate::metadata) encoders |
//! | **Resize** | `image::imageops` with the configured kernel and gamma |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for width selection and dimension math (unit testable)
//! - **Parameters**: Data structures describing a resize
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Variants**: [`generate_image_variants`], combining calculations + backend
//! - **Overlay**: debug dimension stamp

pub mod backend;
mod calculations;
mod overlay;
mod params;
pub mod rust_backend;
pub mod variants;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{aspect_ratio, calculate_variant_height, calculate_variant_widths};
pub use overlay::DEBUG_ENV;
pub use params::ResizeParams;
pub use rust_backend::{RustBackend, supported_input_extensions};
pub use variants::{
    GeneratedVariant, VariantError, VariantRequest, VariantSet, generate_image_variants,
};
