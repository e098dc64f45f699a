//! Per-image metadata extractors.
//!
//! Three independent analyzers of a single source image. None of them
//! mutate anything, so the processor runs them concurrently on the same file.
//!
//! | Extractor | Input | Output |
//! |---|---|---|
//! | [`read_exif`](self::exif::read_exif) | source path | [`ExifItem`](crate::types::ExifItem): camera properties + GPS point |
//! | [`average_color`](self::color::average_color) | decoded image | [`AverageColor`](crate::types::AverageColor): `#rrggbb` + dark flag |
//! | [`encode`](self::blurhash::encode) | small RGBA buffer | base-83 placeholder string |
//!
//! Decoding and resizing for color and blurhash are done by the
//! [`ImageBackend`](crate::imaging::ImageBackend); these modules only see pixels.
//! [`lookup`] holds the camera name substitution tables used by the EXIF reader.

pub mod blurhash;
pub mod color;
pub mod exif;
pub mod lookup;

pub use self::blurhash::BlurhashOptions;
pub use self::exif::ExifError;
