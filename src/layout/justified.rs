//! Justified (row-packed) layout.
//!
//! Items are added to a row until the height that makes the row exactly fill
//! the container drops to or below the target height. Panoramas (aspect
//! ratio above the threshold) always get a row of their own. The trailing
//! partial row is capped at the target height, i.e. left-aligned rather than
//! stretched.

use super::LayoutItem;

pub const DEFAULT_PANORAMA_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JustifiedOptions {
    pub container_width: f64,
    pub target_row_height: f64,
    pub gap: f64,
    pub panorama_threshold: f64,
}

impl JustifiedOptions {
    pub fn new(container_width: f64, target_row_height: f64, gap: f64) -> Self {
        Self {
            container_width,
            target_row_height,
            gap,
            panorama_threshold: DEFAULT_PANORAMA_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JustifiedRow {
    pub items: Vec<LayoutItem>,
    pub height: f64,
}

/// Height at which `items` exactly fill `container_width`:
/// `(container_width - gap × (n - 1)) / Σ aspect_ratio`.
fn row_height(items: &[LayoutItem], container_width: f64, gap: f64) -> f64 {
    let ratio_sum: f64 = items.iter().map(|i| i.aspect_ratio).sum();
    let gaps = gap * items.len().saturating_sub(1) as f64;
    (container_width - gaps) / ratio_sum
}

/// Pack `items` into justified rows.
pub fn calculate_justified_layout(
    items: &[LayoutItem],
    options: &JustifiedOptions,
) -> Vec<JustifiedRow> {
    let JustifiedOptions {
        container_width,
        target_row_height,
        gap,
        panorama_threshold,
    } = *options;

    if items.is_empty() || container_width <= 0.0 {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut current: Vec<LayoutItem> = Vec::new();

    for &item in items {
        if item.aspect_ratio > panorama_threshold {
            if !current.is_empty() {
                let height = row_height(&current, container_width, gap);
                rows.push(JustifiedRow {
                    items: std::mem::take(&mut current),
                    height,
                });
            }
            rows.push(JustifiedRow {
                items: vec![item],
                height: (container_width / item.aspect_ratio).min(target_row_height),
            });
            continue;
        }

        current.push(item);
        let height = row_height(&current, container_width, gap);
        if height <= target_row_height {
            rows.push(JustifiedRow {
                items: std::mem::take(&mut current),
                height,
            });
        }
    }

    if !current.is_empty() {
        let height = row_height(&current, container_width, gap).min(target_row_height);
        rows.push(JustifiedRow {
            items: current,
            height,
        });
    }

    rows
}

/// Rendered width of an item in a row of the given height.
pub fn calculate_item_width(aspect_ratio: f64, row_height: f64) -> f64 {
    row_height * aspect_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::items_from_ratios;

    fn indices(row: &JustifiedRow) -> Vec<usize> {
        row.items.iter().map(|i| i.index).collect()
    }

    fn options() -> JustifiedOptions {
        JustifiedOptions::new(1000.0, 200.0, 8.0)
    }

    #[test]
    fn empty_items() {
        assert!(calculate_justified_layout(&[], &options()).is_empty());
    }

    #[test]
    fn non_positive_container_width() {
        let items = items_from_ratios(&[1.5, 1.5]);
        for width in [0.0, -100.0] {
            let opts = JustifiedOptions {
                container_width: width,
                ..options()
            };
            assert!(calculate_justified_layout(&items, &opts).is_empty());
        }
    }

    #[test]
    fn three_wide_items_fill_one_row() {
        let items = items_from_ratios(&[2.0, 2.0, 2.0]);
        let rows = calculate_justified_layout(&items, &options());

        assert_eq!(rows.len(), 1);
        assert_eq!(indices(&rows[0]), vec![0, 1, 2]);
        assert_eq!(rows[0].height, 164.0);
    }

    #[test]
    fn rows_break_when_target_reached() {
        // Two items of 2.0: (1000 - 8) / 4 = 248 > 200, keep going; the third fits at 164.
        let items = items_from_ratios(&[2.0, 2.0, 2.0, 2.0, 2.0, 2.0]);
        let rows = calculate_justified_layout(&items, &options());

        assert_eq!(rows.len(), 2);
        assert_eq!(indices(&rows[0]), vec![0, 1, 2]);
        assert_eq!(indices(&rows[1]), vec![3, 4, 5]);
    }

    #[test]
    fn panorama_gets_its_own_row() {
        let items = items_from_ratios(&[1.5, 4.0, 1.5]);
        let rows = calculate_justified_layout(&items, &options());

        assert_eq!(rows.len(), 3);
        assert_eq!(indices(&rows[0]), vec![0]);
        assert_eq!(indices(&rows[1]), vec![1]);
        assert_eq!(indices(&rows[2]), vec![2]);
        // Row flushed by a panorama is not capped
        assert!((rows[0].height - 1000.0 / 1.5).abs() < 1e-9);
        // Panorama: min(1000 / 4, 200)
        assert_eq!(rows[1].height, 200.0);
        // Trailing row is capped
        assert_eq!(rows[2].height, 200.0);
    }

    #[test]
    fn panorama_below_target_keeps_natural_height() {
        let items = items_from_ratios(&[8.0]);
        let rows = calculate_justified_layout(&items, &options());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].height, 125.0);
    }

    #[test]
    fn ratio_at_threshold_is_not_a_panorama() {
        let items = items_from_ratios(&[3.0, 3.0]);
        let rows = calculate_justified_layout(&items, &options());
        // (1000 - 8) / 6 = 165.33 → one shared row
        assert_eq!(rows.len(), 1);
        assert_eq!(indices(&rows[0]), vec![0, 1]);
    }

    #[test]
    fn custom_panorama_threshold() {
        let items = items_from_ratios(&[2.5, 1.0]);
        let opts = JustifiedOptions {
            panorama_threshold: 2.0,
            ..options()
        };
        let rows = calculate_justified_layout(&items, &opts);
        assert_eq!(indices(&rows[0]), vec![0]);
        assert_eq!(rows[0].height, 200.0);
    }

    #[test]
    fn single_item_trailing_row_capped() {
        let items = items_from_ratios(&[1.0]);
        let rows = calculate_justified_layout(&items, &options());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].height, 200.0);
    }

    #[test]
    fn single_wide_item_fits_below_target() {
        let items = items_from_ratios(&[2.5]);
        let opts = JustifiedOptions::new(400.0, 200.0, 8.0);
        let rows = calculate_justified_layout(&items, &opts);
        assert_eq!(rows[0].height, 160.0);
    }

    #[test]
    fn every_item_placed_once_in_order() {
        let ratios = [0.67, 1.5, 1.0, 4.2, 0.8, 1.33, 2.0, 5.0, 1.1];
        let rows = calculate_justified_layout(&items_from_ratios(&ratios), &options());
        let placed: Vec<usize> = rows.iter().flat_map(indices).collect();
        assert_eq!(placed, (0..ratios.len()).collect::<Vec<_>>());
    }

    #[test]
    fn full_rows_fill_container_width() {
        let items = items_from_ratios(&[1.5, 0.75, 1.0, 1.5, 1.33, 0.8, 1.5]);
        let opts = options();
        let rows = calculate_justified_layout(&items, &opts);
        for row in &rows[..rows.len() - 1] {
            let width: f64 = row
                .items
                .iter()
                .map(|i| calculate_item_width(i.aspect_ratio, row.height))
                .sum::<f64>()
                + opts.gap * (row.items.len() - 1) as f64;
            assert!((width - opts.container_width).abs() < 1e-6);
        }
    }

    #[test]
    fn item_width() {
        assert_eq!(calculate_item_width(1.5, 200.0), 300.0);
        assert_eq!(calculate_item_width(0.5, 164.0), 82.0);
    }
}
