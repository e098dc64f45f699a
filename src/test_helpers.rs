//! Shared test utilities: synthetic images written with the `image` crate.
//!
//! No binary fixtures are checked in. JPEGs carrying EXIF are produced by
//! splicing a hand-built APP1 segment (little-endian TIFF with IFD0 and an
//! optional GPS IFD) right after the SOI marker of an encoded image.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

// =========================================================================
// Plain images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(gradient(width, height))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .unwrap();
    buf
}

/// Write a gradient JPEG without metadata.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode_jpeg(width, height)).unwrap();
}

/// Write a single-color PNG.
pub fn create_solid_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(color))
        .save(path)
        .unwrap();
}

// =========================================================================
// EXIF fixtures
// =========================================================================

/// GPS values written into the fixture's GPS IFD.
///
/// Defaults decode to latitude 50.5 N, longitude 17.25 E, altitude 133.4 m.
#[derive(Debug, Clone, Copy)]
pub struct GpsFixture {
    pub latitude_ref: u8,
    pub latitude: [(u32, u32); 3],
    pub longitude_ref: u8,
    pub longitude: [(u32, u32); 3],
    pub altitude_ref: u8,
    pub altitude: (u32, u32),
}

impl Default for GpsFixture {
    fn default() -> Self {
        Self {
            latitude_ref: b'N',
            latitude: [(50, 1), (30, 1), (0, 1)],
            longitude_ref: b'E',
            longitude: [(17, 1), (15, 1), (0, 1)],
            altitude_ref: 0,
            altitude: (1334, 10),
        }
    }
}

const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

struct IfdEntry {
    tag: u16,
    kind: u16,
    count: u32,
    value: Vec<u8>,
}

impl IfdEntry {
    fn ascii(tag: u16, text: &str) -> Self {
        let mut value = text.as_bytes().to_vec();
        value.push(0);
        Self {
            tag,
            kind: TYPE_ASCII,
            count: value.len() as u32,
            value,
        }
    }

    fn rationals(tag: u16, values: &[(u32, u32)]) -> Self {
        let value = values
            .iter()
            .flat_map(|(n, d)| n.to_le_bytes().into_iter().chain(d.to_le_bytes()))
            .collect();
        Self {
            tag,
            kind: TYPE_RATIONAL,
            count: values.len() as u32,
            value,
        }
    }

    fn byte(tag: u16, value: u8) -> Self {
        Self {
            tag,
            kind: TYPE_BYTE,
            count: 1,
            value: vec![value],
        }
    }

    fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            kind: TYPE_LONG,
            count: 1,
            value: value.to_le_bytes().to_vec(),
        }
    }

    /// Out-of-line bytes this entry needs, padded to a word boundary.
    fn data_len(&self) -> usize {
        if self.value.len() <= 4 {
            0
        } else {
            self.value.len().next_multiple_of(2)
        }
    }
}

fn ifd_len(entries: &[IfdEntry]) -> usize {
    2 + 12 * entries.len() + 4 + entries.iter().map(IfdEntry::data_len).sum::<usize>()
}

/// Append an IFD (entries sorted by tag, no next IFD) and its data area.
fn write_ifd(tiff: &mut Vec<u8>, entries: &[IfdEntry]) {
    let start = tiff.len();
    let mut data_offset = start + 2 + 12 * entries.len() + 4;
    let mut data = Vec::new();

    tiff.extend((entries.len() as u16).to_le_bytes());
    for entry in entries {
        tiff.extend(entry.tag.to_le_bytes());
        tiff.extend(entry.kind.to_le_bytes());
        tiff.extend(entry.count.to_le_bytes());
        if entry.value.len() <= 4 {
            let mut inline = entry.value.clone();
            inline.resize(4, 0);
            tiff.extend(inline);
        } else {
            tiff.extend((data_offset as u32).to_le_bytes());
            data.extend(&entry.value);
            if entry.value.len() % 2 == 1 {
                data.push(0);
            }
            data_offset += entry.data_len();
        }
    }
    tiff.extend(0u32.to_le_bytes());
    tiff.extend(data);
}

fn build_tiff(make: &str, gps: Option<GpsFixture>) -> Vec<u8> {
    let mut tiff = b"II".to_vec();
    tiff.extend(42u16.to_le_bytes());
    tiff.extend(8u32.to_le_bytes());

    let mut ifd0 = vec![IfdEntry::ascii(0x010F, make)];
    // Pointer entry has no out-of-line data, so its size is known up front.
    let gps_offset = 8 + ifd_len(&ifd0) + 12;
    if gps.is_some() {
        ifd0.push(IfdEntry::long(0x8825, gps_offset as u32));
    }
    write_ifd(&mut tiff, &ifd0);

    if let Some(gps) = gps {
        debug_assert_eq!(tiff.len(), gps_offset);
        let lat_ref = String::from(gps.latitude_ref as char);
        let lon_ref = String::from(gps.longitude_ref as char);
        write_ifd(
            &mut tiff,
            &[
                IfdEntry::ascii(0x0001, &lat_ref),
                IfdEntry::rationals(0x0002, &gps.latitude),
                IfdEntry::ascii(0x0003, &lon_ref),
                IfdEntry::rationals(0x0004, &gps.longitude),
                IfdEntry::byte(0x0005, gps.altitude_ref),
                IfdEntry::rationals(0x0006, &[gps.altitude]),
            ],
        );
    }
    tiff
}

/// Write a gradient JPEG with an EXIF block holding `Make` and optional GPS.
pub fn create_test_jpeg_with_exif(
    path: &Path,
    width: u32,
    height: u32,
    make: &str,
    gps: Option<GpsFixture>,
) {
    let jpeg = encode_jpeg(width, height);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "encoder output must start with SOI");

    let tiff = build_tiff(make, gps);
    let mut app1 = vec![0xFF, 0xE1];
    app1.extend(((2 + 6 + tiff.len()) as u16).to_be_bytes());
    app1.extend(b"Exif\0\0");
    app1.extend(tiff);

    let mut out = jpeg[..2].to_vec();
    out.extend(app1);
    out.extend(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}
