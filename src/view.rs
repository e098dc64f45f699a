//! Rendering-facing view of a feature record.
//!
//! The rendering layer needs less than a [`Feature`] carries and in a
//! different shape: a placeholder (color + blurhash) to paint while loading,
//! and ready-made `src`/`srcset`/`sizes` attribute values.

use crate::types::Feature;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    pub color: String,
    pub is_dark: bool,
    pub blurhash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSources {
    pub src: String,
    pub srcset: String,
    pub sizes: String,
    /// Available widths, ascending.
    pub widths: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageViewModel {
    pub id: String,
    pub aspect_ratio: f64,
    pub placeholder: Placeholder,
    pub sources: ImageSources,
}

/// `sizes` attribute for an image whose largest variant is `max_width` pixels.
pub fn compute_sizes(max_width: u32) -> String {
    let mut sizes = Vec::with_capacity(3);
    if max_width >= 1200 {
        sizes.push("(min-width: 1200px) 1200px".to_string());
    }
    if max_width >= 768 {
        sizes.push("(min-width: 768px) 768px".to_string());
    }
    sizes.push(format!("{}px", max_width.min(640)));
    sizes.join(", ")
}

/// Build the view model, prefixing every asset href with `href_prefix`
/// (e.g. the URL the cache root is served under).
///
/// Returns `None` for a feature without assets: there is nothing to render.
pub fn to_view_model(feature: &Feature, href_prefix: &str) -> Option<ImageViewModel> {
    let first = feature.assets.first()?;
    let href = |path: &str| format!("{href_prefix}{path}");

    let mut widths: Vec<u32> = feature.assets.iter().map(|a| a.width).collect();
    widths.sort_unstable();
    let max_width = widths.last().copied().unwrap_or(first.width);

    let srcset = feature
        .assets
        .iter()
        .map(|a| format!("{} {}w", href(&a.href), a.width))
        .collect::<Vec<_>>()
        .join(", ");

    let properties = &feature.properties;
    Some(ImageViewModel {
        id: feature.id.clone(),
        aspect_ratio: properties.aspect_ratio,
        placeholder: Placeholder {
            color: properties.average_color.hex.clone(),
            is_dark: properties.average_color.is_dark,
            blurhash: properties.blurhash.clone(),
        },
        sources: ImageSources {
            src: href(&first.href),
            srcset,
            sizes: compute_sizes(max_width),
            widths,
        },
    })
}

/// View models for a feature collection, skipping features without assets.
pub fn to_view_models(features: &[Feature], href_prefix: &str) -> Vec<ImageViewModel> {
    features
        .iter()
        .filter_map(|f| to_view_model(f, href_prefix))
        .collect()
}
