//! Gallery layout engines.
//!
//! Pure geometry over a sequence of [`LayoutItem`]s: no I/O, no shared
//! state, safe to call from anywhere and cheap enough to recompute on every
//! viewport change.
//!
//! | Engine | Output | Entry points |
//! |---|---|---|
//! | Justified | rows with a shared height | [`calculate_justified_layout`], [`calculate_item_width`] |
//! | Waterfall | round-robin columns with filler heights | [`calculate_waterfall_layout`], [`calculate_column_count`] |

mod justified;
mod waterfall;

pub use justified::{
    DEFAULT_PANORAMA_THRESHOLD, JustifiedOptions, JustifiedRow, calculate_item_width,
    calculate_justified_layout,
};
pub use waterfall::{WaterfallColumn, calculate_column_count, calculate_waterfall_layout};

use crate::types::Feature;

/// Layout input: an aspect ratio and the item's position in the source list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutItem {
    pub aspect_ratio: f64,
    pub index: usize,
}

impl LayoutItem {
    pub fn new(aspect_ratio: f64, index: usize) -> Self {
        Self {
            aspect_ratio,
            index,
        }
    }
}

/// Layout items for a feature collection, indexed in order.
pub fn items_from_features(features: &[Feature]) -> Vec<LayoutItem> {
    features
        .iter()
        .enumerate()
        .map(|(index, f)| LayoutItem::new(f.properties.aspect_ratio, index))
        .collect()
}

/// Items with the given aspect ratios, indexed in order.
#[cfg(test)]
pub(crate) fn items_from_ratios(ratios: &[f64]) -> Vec<LayoutItem> {
    ratios
        .iter()
        .enumerate()
        .map(|(index, &ratio)| LayoutItem::new(ratio, index))
        .collect()
}
