//! CLI output formatting for the `process`, `layout` and `show-config` commands.
//!
//! # Information-First Display
//!
//! Every entity leads with its positional index and a human label (the source
//! file name). Paths and derived values are secondary context on indented
//! lines, so the output reads as an inventory of images rather than a list
//! of cache directories.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! 001 dawn.jpg (processed)
//!     Source: photos/dawn.jpg
//!     Variants: 640, 768, 1280
//!     Feature: .gallerist/1a2b3c4d-dawn-0123456789abcdef/index.json
//! 002 dusk.jpg (cached)
//!     ...
//! 003 broken.jpg (failed)
//!     Source: photos/broken.jpg
//!     Error: Failed to process /work/photos/broken.jpg: ...
//! ```
//!
//! ## Layout
//!
//! ```text
//! Row 1 (height 243.2)
//!     001 dawn.jpg 364.8px
//!     002 dusk.jpg 182.4px
//!
//! Column 1 (filler 0.667)
//!     001 dawn.jpg
//!     003 noon.jpg
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::layout::{JustifiedRow, LayoutItem, WaterfallColumn, calculate_item_width};
use crate::process::BatchReport;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name of `path`, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Item line for layout output: index (1-based) and label.
fn item_line(item: &LayoutItem, labels: &[String]) -> String {
    let label = labels
        .get(item.index)
        .map(String::as_str)
        .unwrap_or("(unknown)");
    format!("{} {}", format_index(item.index + 1), label)
}

/// Path relative to `base` when possible, for shorter context lines.
fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Process output
// ============================================================================

/// Format one block per source in batch order.
///
/// `base` shortens the displayed source and feature paths; pass the
/// working directory or the configured root.
pub fn format_process_report(report: &BatchReport, base: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, outcome) in report.outcomes.iter().enumerate() {
        let name = display_name(&outcome.source);
        let source = relative_display(&outcome.source, base);
        match &outcome.result {
            Ok(result) => {
                let status = if result.cached { "cached" } else { "processed" };
                lines.push(format!("{} {} ({})", format_index(i + 1), name, status));
                lines.push(format!("{}Source: {}", indent(1), source));
                let widths: Vec<String> = result
                    .feature
                    .assets
                    .iter()
                    .map(|a| a.width.to_string())
                    .collect();
                if widths.is_empty() {
                    lines.push(format!(
                        "{}Variants: none (source narrower than all widths)",
                        indent(1)
                    ));
                } else {
                    lines.push(format!("{}Variants: {}", indent(1), widths.join(", ")));
                }
                lines.push(format!(
                    "{}Feature: {}",
                    indent(1),
                    relative_display(&result.feature_file, base)
                ));
            }
            Err(e) => {
                lines.push(format!("{} {} (failed)", format_index(i + 1), name));
                lines.push(format!("{}Source: {}", indent(1), source));
                lines.push(format!("{}Error: {}", indent(1), e));
            }
        }
    }

    lines
}

pub fn print_process_report(report: &BatchReport, base: &Path) {
    for line in format_process_report(report, base) {
        println!("{}", line);
    }
    println!("Cache: {}", report.stats);
}

// ============================================================================
// Layout output
// ============================================================================

/// Justified rows with the rendered width of every item.
pub fn format_justified_rows(rows: &[JustifiedRow], labels: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        lines.push(format!("Row {} (height {:.1})", i + 1, row.height));
        for item in &row.items {
            let width = calculate_item_width(item.aspect_ratio, row.height);
            lines.push(format!("{}{} {:.1}px", indent(1), item_line(item, labels), width));
        }
    }
    lines
}

/// Waterfall columns with their filler heights (in container-width units).
pub fn format_waterfall_columns(columns: &[WaterfallColumn], labels: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, column) in columns.iter().enumerate() {
        lines.push(format!("Column {} (filler {:.3})", i + 1, column.filler_height));
        for item in &column.items {
            lines.push(format!("{}{}", indent(1), item_line(item, labels)));
        }
    }
    lines
}

/// Wall mode: items in source order with their aspect ratios.
pub fn format_wall(items: &[LayoutItem], labels: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| format!("{} (ratio {:.3})", item_line(item, labels), item.aspect_ratio))
        .collect()
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Config output
// ============================================================================

/// Comment header naming where the effective config came from.
pub fn format_config_source(source: Option<&Path>) -> String {
    match source {
        Some(path) => format!("# Loaded from {}", path.display()),
        None => "# No .gallerist.toml found; showing stock defaults".to_string(),
    }
}
