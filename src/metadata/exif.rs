//! EXIF and GPS extraction.
//!
//! Reads the primary IFD with `kamadak-exif` and maps it to [`ExifItem`]:
//!
//! | Property | Tag | Conversion |
//! |---|---|---|
//! | `make` / `model` / `lens` | Make, Model, LensModel | substitution table |
//! | `dateTime` | DateTimeOriginal + OffsetTimeOriginal | ISO-8601 |
//! | `artist` / `copyright` | Artist, Copyright | as-is |
//! | `exposureTime` | ExposureTime | [`make_rational`] |
//! | `fNumber` / `focalLength` | FNumber, FocalLength | [`make_rational`], 1 decimal |
//! | `iso` | PhotographicSensitivity | as-is |
//! | geometry | GPS IFD | [`gps_point`] |
//!
//! A readable container without an EXIF block yields an empty record. A file
//! that cannot be opened or is not a recognizable container is an error.

use crate::config::ExifConfig;
use crate::metadata::lookup::substitute;
use crate::types::{ExifItem, ExifProperties, Fraction, GeoPoint};
use chrono::{FixedOffset, NaiveDateTime, SecondsFormat, TimeZone};
use exif::{Context, Exif, In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// OffsetTimeOriginal (Exif 2.31), addressed by number.
const OFFSET_TIME_ORIGINAL: Tag = Tag(Context::Exif, 0x9011);

/// Error from [`read_exif`].
#[derive(Debug, thiserror::Error)]
pub enum ExifError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid EXIF container: {0}")]
    Parse(#[from] exif::Error),
}

/// Read EXIF/GPS data from `path`, mapping names through `config`'s tables.
pub fn read_exif(path: &Path, config: &ExifConfig) -> Result<ExifItem, ExifError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(ExifItem::default()),
        Err(e) => return Err(e.into()),
    };
    Ok(map_exif(&exif, config))
}

fn map_exif(exif: &Exif, config: &ExifConfig) -> ExifItem {
    let properties = ExifProperties {
        make: ascii(exif, Tag::Make)
            .map(|v| substitute(&v, &config.make_map, "make", config.warn_on_unknown_make)),
        model: ascii(exif, Tag::Model)
            .map(|v| substitute(&v, &config.model_map, "model", config.warn_on_unknown_model)),
        date_time: ascii(exif, Tag::DateTimeOriginal).and_then(|date| {
            format_date_time(&date, ascii(exif, OFFSET_TIME_ORIGINAL).as_deref())
        }),
        artist: ascii(exif, Tag::Artist),
        copyright: ascii(exif, Tag::Copyright),
        exposure_time: rational(exif, Tag::ExposureTime).and_then(|v| make_rational(v, None)),
        f_number: rational(exif, Tag::FNumber).and_then(|v| make_rational(v, Some(1))),
        iso: exif
            .get_field(Tag::PhotographicSensitivity, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0)),
        focal_length: rational(exif, Tag::FocalLength).and_then(|v| make_rational(v, Some(1))),
        lens: ascii(exif, Tag::LensModel)
            .map(|v| substitute(&v, &config.lens_map, "lens", config.warn_on_unknown_lens)),
    };
    ExifItem {
        geometry: gps_point(exif),
        properties,
    }
}

/// First ASCII string of a tag, trimmed of padding. Empty strings count as absent.
fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Ascii(ref values) = field.value else {
        return None;
    };
    let text = String::from_utf8_lossy(values.first()?);
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    (!text.is_empty()).then(|| text.to_string())
}

/// Rational values of a tag as floats, skipping zero denominators.
fn rationals(exif: &Exif, tag: Tag) -> Option<Vec<f64>> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Rational(ref values) => Some(
            values
                .iter()
                .filter(|r| r.denom != 0)
                .map(|r| r.to_f64())
                .collect(),
        ),
        Value::SRational(ref values) => Some(
            values
                .iter()
                .filter(|r| r.denom != 0)
                .map(|r| r.to_f64())
                .collect(),
        ),
        _ => None,
    }
}

fn rational(exif: &Exif, tag: Tag) -> Option<f64> {
    rationals(exif, tag)?.first().copied()
}

/// Convert a camera value to a `[numerator, denominator]` pair.
///
/// Values below 1 invert to `[1, round(1/value)]`; values of 1 or more become
/// `[value, 1]`, rounded to `decimals` places when given. Non-positive and
/// non-finite values have no meaningful fraction and return `None`.
pub fn make_rational(value: f64, decimals: Option<u32>) -> Option<Fraction> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    if value < 1.0 {
        return Some(Fraction(1.0, (1.0 / value).round()));
    }
    let value = match decimals {
        Some(places) => {
            let scale = 10f64.powi(places as i32);
            (value * scale).round() / scale
        }
        None => value,
    };
    Some(Fraction(value, 1.0))
}

/// Render an EXIF `YYYY:MM:DD HH:MM:SS` timestamp as ISO-8601.
///
/// `offset` is an OffsetTimeOriginal value such as `+02:00`. Without one the
/// result carries no zone. Unparseable timestamps return `None`.
pub fn format_date_time(value: &str, offset: Option<&str>) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), "%Y:%m:%d %H:%M:%S").ok()?;
    match offset.and_then(parse_offset) {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false)),
        None => Some(naive.format("%Y-%m-%dT%H:%M:%S").to_string()),
    }
}

/// Parse `±HH:MM`.
fn parse_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => (1, value),
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Degrees/minutes/seconds to decimal degrees.
fn dms_to_degrees(parts: &[f64]) -> Option<f64> {
    let degrees = *parts.first()?;
    let minutes = parts.get(1).copied().unwrap_or(0.0);
    let seconds = parts.get(2).copied().unwrap_or(0.0);
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

/// GPS tags as a point geometry, or `None` when latitude or longitude is missing.
///
/// Latitude is negated for an `S` reference, longitude for `W`, and altitude
/// for reference 1 (below sea level).
pub fn gps_point(exif: &Exif) -> Option<GeoPoint> {
    let mut latitude = dms_to_degrees(&rationals(exif, Tag::GPSLatitude)?)?;
    let mut longitude = dms_to_degrees(&rationals(exif, Tag::GPSLongitude)?)?;
    if ascii(exif, Tag::GPSLatitudeRef).is_some_and(|r| r.eq_ignore_ascii_case("S")) {
        latitude = -latitude;
    }
    if ascii(exif, Tag::GPSLongitudeRef).is_some_and(|r| r.eq_ignore_ascii_case("W")) {
        longitude = -longitude;
    }

    let altitude = rational(exif, Tag::GPSAltitude).map(|alt| {
        let below_sea_level = exif
            .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
            == Some(1);
        if below_sea_level { -alt } else { alt }
    });

    Some(GeoPoint::new(longitude, latitude, altitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{GpsFixture, create_test_jpeg, create_test_jpeg_with_exif};
    use tempfile::TempDir;

    #[test]
    fn rational_below_one_inverts() {
        assert_eq!(make_rational(0.004, None), Some(Fraction(1.0, 250.0)));
        assert_eq!(make_rational(1.0 / 3.0, None), Some(Fraction(1.0, 3.0)));
    }

    #[test]
    fn rational_at_least_one_is_kept() {
        assert_eq!(make_rational(2.0, None), Some(Fraction(2.0, 1.0)));
        assert_eq!(make_rational(1.0, None), Some(Fraction(1.0, 1.0)));
    }

    #[test]
    fn rational_rounds_to_decimals() {
        assert_eq!(make_rational(2.8000001, Some(1)), Some(Fraction(2.8, 1.0)));
        assert_eq!(make_rational(6.765, Some(1)), Some(Fraction(6.8, 1.0)));
    }

    #[test]
    fn rational_non_positive_is_none() {
        assert_eq!(make_rational(0.0, None), None);
        assert_eq!(make_rational(-1.0, None), None);
        assert_eq!(make_rational(f64::NAN, None), None);
    }

    #[test]
    fn date_without_offset() {
        assert_eq!(
            format_date_time("2024:06:01 14:30:05", None).as_deref(),
            Some("2024-06-01T14:30:05")
        );
    }

    #[test]
    fn date_with_offset() {
        assert_eq!(
            format_date_time("2024:06:01 14:30:05", Some("+02:00")).as_deref(),
            Some("2024-06-01T14:30:05+02:00")
        );
        assert_eq!(
            format_date_time("2024:06:01 14:30:05", Some("-05:30")).as_deref(),
            Some("2024-06-01T14:30:05-05:30")
        );
    }

    #[test]
    fn date_with_garbage_offset_drops_zone() {
        assert_eq!(
            format_date_time("2024:06:01 14:30:05", Some("   ")).as_deref(),
            Some("2024-06-01T14:30:05")
        );
    }

    #[test]
    fn date_unparseable_is_none() {
        assert_eq!(format_date_time("0000:00:00 00:00:00", None), None);
        assert_eq!(format_date_time("yesterday", None), None);
    }

    #[test]
    fn dms_conversion() {
        assert_eq!(dms_to_degrees(&[50.0, 30.0, 0.0]), Some(50.5));
        assert_eq!(dms_to_degrees(&[10.0]), Some(10.0));
        assert_eq!(dms_to_degrees(&[]), None);
    }

    #[test]
    fn jpeg_without_exif_is_empty_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.jpg");
        create_test_jpeg(&path, 32, 24);

        let item = read_exif(&path, &ExifConfig::default()).unwrap();
        assert_eq!(item, ExifItem::default());
    }

    #[test]
    fn missing_file_is_error() {
        let result = read_exif(Path::new("/nonexistent/a.jpg"), &ExifConfig::default());
        assert!(matches!(result, Err(ExifError::Io(_))));
    }

    #[test]
    fn non_image_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.jpg");
        std::fs::write(&path, "not an image at all").unwrap();
        assert!(read_exif(&path, &ExifConfig::default()).is_err());
    }

    #[test]
    fn reads_make_and_gps() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("geo.jpg");
        create_test_jpeg_with_exif(&path, 32, 24, "Canon", Some(GpsFixture::default()));

        let item = read_exif(&path, &ExifConfig::default()).unwrap();
        assert_eq!(item.properties.make.as_deref(), Some("Canon"));
        let geometry = item.geometry.expect("GPS geometry");
        assert_eq!(geometry.coordinates.len(), 3);
        assert!((geometry.coordinates[0] - 17.25).abs() < 1e-9);
        assert!((geometry.coordinates[1] - 50.5).abs() < 1e-9);
        assert!((geometry.coordinates[2] - 133.4).abs() < 1e-9);
    }

    #[test]
    fn southern_western_references_negate() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("south.jpg");
        let gps = GpsFixture {
            latitude_ref: b'S',
            longitude_ref: b'W',
            ..GpsFixture::default()
        };
        create_test_jpeg_with_exif(&path, 32, 24, "Canon", Some(gps));

        let geometry = read_exif(&path, &ExifConfig::default())
            .unwrap()
            .geometry
            .unwrap();
        assert!((geometry.coordinates[0] + 17.25).abs() < 1e-9);
        assert!((geometry.coordinates[1] + 50.5).abs() < 1e-9);
    }

    #[test]
    fn make_goes_through_substitution_table() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nikon.jpg");
        create_test_jpeg_with_exif(&path, 32, 24, "NIKON CORPORATION", None);

        let item = read_exif(&path, &ExifConfig::default()).unwrap();
        assert_eq!(item.properties.make.as_deref(), Some("Nikon"));
        assert!(item.geometry.is_none());
    }
}
