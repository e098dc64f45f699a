//! Records shared between the processor, the cache, and the layout/view layer.
//!
//! The [`Feature`] record is the unit of output: one per processed source
//! image, serialized as `index.json` inside its cache entry. The JSON shape is
//! GeoJSON-like and consumed by the rendering layer, so field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Marker serialized as `"type": "Feature"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

/// Marker serialized as `"type": "Point"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointType {
    #[default]
    Point,
}

/// GeoJSON point: `[longitude, latitude]` or `[longitude, latitude, altitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: PointType,
    pub coordinates: Vec<f64>,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64, altitude: Option<f64>) -> Self {
        let mut coordinates = vec![longitude, latitude];
        coordinates.extend(altitude);
        Self {
            kind: PointType::Point,
            coordinates,
        }
    }
}

/// A camera value as `[numerator, denominator]`.
///
/// Values below 1 are stored inverted (`1/250 s` → `[1, 250]`), values of 1
/// or more as `[value, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fraction(pub f64, pub f64);

/// EXIF-derived properties. Absent tags are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExifProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// ISO-8601, with offset when the camera recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<Fraction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_number: Option<Fraction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<Fraction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
}

/// Output of the EXIF extractor: optional GPS geometry plus properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExifItem {
    pub geometry: Option<GeoPoint>,
    pub properties: ExifProperties,
}

/// Average color of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageColor {
    /// `#rrggbb`
    pub hex: String,
    pub is_dark: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    #[serde(flatten)]
    pub exif: ExifProperties,
    pub aspect_ratio: f64,
    pub blurhash: String,
    pub average_color: AverageColor,
}

/// One generated variant, addressed relative to the cache root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// `{cache entry dir}/{basename}-{width}{ext}`
    pub href: String,
    pub width: u32,
}

/// The per-image output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    /// Source hash of the image.
    pub id: String,
    pub geometry: Option<GeoPoint>,
    pub properties: FeatureProperties,
    pub assets: Vec<Asset>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_feature() -> Feature {
        Feature {
            kind: FeatureType::Feature,
            id: "0123456789abcdef".into(),
            geometry: Some(GeoPoint::new(17.25, 50.5, Some(133.4))),
            properties: FeatureProperties {
                exif: ExifProperties {
                    make: Some("Canon".into()),
                    exposure_time: Some(Fraction(1.0, 250.0)),
                    f_number: Some(Fraction(2.8, 1.0)),
                    iso: Some(200),
                    ..ExifProperties::default()
                },
                aspect_ratio: 1.5,
                blurhash: "LEHV6nWB2yk8pyo0adR*.7kCMdnj".into(),
                average_color: AverageColor {
                    hex: "#a18665".into(),
                    is_dark: false,
                },
            },
            assets: vec![Asset {
                href: "1a2b3c4d-dawn-0123456789abcdef/dawn-640.jpg".into(),
                width: 640,
            }],
        }
    }

    #[test]
    fn feature_json_shape() {
        let value = serde_json::to_value(sample_feature()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "id": "0123456789abcdef",
                "geometry": {"type": "Point", "coordinates": [17.25, 50.5, 133.4]},
                "properties": {
                    "make": "Canon",
                    "exposureTime": [1.0, 250.0],
                    "fNumber": [2.8, 1.0],
                    "iso": 200,
                    "aspectRatio": 1.5,
                    "blurhash": "LEHV6nWB2yk8pyo0adR*.7kCMdnj",
                    "averageColor": {"hex": "#a18665", "isDark": false}
                },
                "assets": [{"href": "1a2b3c4d-dawn-0123456789abcdef/dawn-640.jpg", "width": 640}]
            })
        );
    }

    #[test]
    fn feature_json_parses_back() {
        let feature = sample_feature();
        let text = serde_json::to_string(&feature).unwrap();
        let parsed: Feature = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, feature);
    }

    #[test]
    fn null_geometry_serializes_as_null() {
        let mut feature = sample_feature();
        feature.geometry = None;
        let value = serde_json::to_value(feature).unwrap();
        assert!(value["geometry"].is_null());
    }

    #[test]
    fn geo_point_without_altitude() {
        let point = GeoPoint::new(-3.5, 40.0, None);
        assert_eq!(point.coordinates, vec![-3.5, 40.0]);
    }
}
