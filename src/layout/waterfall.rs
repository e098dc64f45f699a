//! Waterfall (masonry) layout.
//!
//! Items are dealt to columns round-robin by position, not by current column
//! height, so placement is stable as items load. Each column reports the
//! filler height that would bring it level with the tallest column, in units
//! of column width.

use super::LayoutItem;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallColumn {
    pub items: Vec<LayoutItem>,
    pub filler_height: f64,
}

/// Column count for a container width.
///
/// `breakpoints` maps minimum container width to column count; the largest
/// breakpoint not exceeding `container_width` wins. Defaults to 1.
pub fn calculate_column_count(container_width: f64, breakpoints: &BTreeMap<u32, u32>) -> usize {
    breakpoints
        .iter()
        .take_while(|&(&min_width, _)| container_width >= min_width as f64)
        .last()
        .map(|(_, &columns)| columns as usize)
        .unwrap_or(1)
}

/// Deal `items` into `column_count` columns.
pub fn calculate_waterfall_layout(
    items: &[LayoutItem],
    column_count: usize,
) -> Vec<WaterfallColumn> {
    if items.is_empty() || column_count == 0 {
        return Vec::new();
    }

    let mut columns: Vec<Vec<LayoutItem>> = vec![Vec::new(); column_count];
    for (position, &item) in items.iter().enumerate() {
        columns[position % column_count].push(item);
    }

    let heights: Vec<f64> = columns
        .iter()
        .map(|col| col.iter().map(|i| 1.0 / i.aspect_ratio).sum())
        .collect();
    let tallest = heights.iter().copied().fold(0.0, f64::max);

    columns
        .into_iter()
        .zip(heights)
        .map(|(items, height)| WaterfallColumn {
            items,
            filler_height: tallest - height,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::items_from_ratios;

    fn default_breakpoints() -> BTreeMap<u32, u32> {
        BTreeMap::from([(640, 2), (768, 3), (1024, 4)])
    }

    fn indices(column: &WaterfallColumn) -> Vec<usize> {
        column.items.iter().map(|i| i.index).collect()
    }

    #[test]
    fn round_robin_distribution() {
        let items = items_from_ratios(&[1.0; 6]);
        let columns = calculate_waterfall_layout(&items, 3);

        assert_eq!(columns.len(), 3);
        assert_eq!(indices(&columns[0]), vec![0, 3]);
        assert_eq!(indices(&columns[1]), vec![1, 4]);
        assert_eq!(indices(&columns[2]), vec![2, 5]);
    }

    #[test]
    fn filler_heights_equalize_columns() {
        let items = items_from_ratios(&[0.5, 2.0, 0.5]);
        let columns = calculate_waterfall_layout(&items, 3);

        let fillers: Vec<f64> = columns.iter().map(|c| c.filler_height).collect();
        assert_eq!(fillers, vec![0.0, 1.5, 0.0]);
    }

    #[test]
    fn placement_ignores_column_height() {
        // A greedy packer would put item 2 under the short column 1
        let items = items_from_ratios(&[0.25, 4.0, 1.0]);
        let columns = calculate_waterfall_layout(&items, 2);
        assert_eq!(indices(&columns[0]), vec![0, 2]);
        assert_eq!(indices(&columns[1]), vec![1]);
    }

    #[test]
    fn more_columns_than_items() {
        let items = items_from_ratios(&[1.0, 2.0]);
        let columns = calculate_waterfall_layout(&items, 4);
        assert_eq!(columns.len(), 4);
        assert!(columns[2].items.is_empty());
        assert_eq!(columns[2].filler_height, 1.0);
        assert_eq!(columns[1].filler_height, 0.5);
    }

    #[test]
    fn empty_inputs() {
        assert!(calculate_waterfall_layout(&[], 3).is_empty());
        assert!(calculate_waterfall_layout(&items_from_ratios(&[1.0]), 0).is_empty());
    }

    #[test]
    fn column_count_breakpoints() {
        let breakpoints = default_breakpoints();
        assert_eq!(calculate_column_count(500.0, &breakpoints), 1);
        assert_eq!(calculate_column_count(640.0, &breakpoints), 2);
        assert_eq!(calculate_column_count(900.0, &breakpoints), 3);
        assert_eq!(calculate_column_count(1024.0, &breakpoints), 4);
        assert_eq!(calculate_column_count(1200.0, &breakpoints), 4);
    }

    #[test]
    fn column_count_without_breakpoints() {
        assert_eq!(calculate_column_count(2000.0, &BTreeMap::new()), 1);
    }

    #[test]
    fn column_count_zero_width_breakpoint() {
        let breakpoints = BTreeMap::from([(0, 2), (800, 5)]);
        assert_eq!(calculate_column_count(10.0, &breakpoints), 2);
        assert_eq!(calculate_column_count(800.0, &breakpoints), 5);
    }
}
