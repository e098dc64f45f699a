//! Camera display-name substitution tables.
//!
//! Raw make/model/lens strings written by cameras are often noisy
//! (`NIKON CORPORATION`, `NIKON Z6_3`). These tables map them to display
//! names by exact match. The defaults below are what `[exif]` starts from;
//! a table set in `.gallerist.toml` replaces its default entirely.

use std::collections::BTreeMap;
use tracing::warn;

const DEFAULT_MAKES: &[(&str, &str)] = &[
    ("Apple", "Apple"),
    ("Canon", "Canon"),
    ("NIKON CORPORATION", "Nikon"),
    ("RICOH IMAGING COMPANY, LTD.", "Ricoh"),
];

const DEFAULT_MODELS: &[(&str, &str)] = &[
    ("Canon EOS M6 Mark II", "Canon EOS M6 MkII"),
    ("NIKON Z6_3", "Nikon Z6 III"),
    ("iPhone 15 Pro Max", "Apple iPhone 15 Pro Max"),
    ("RICOH GR IIIx", "Ricoh GR IIIx"),
];

const DEFAULT_LENSES: &[(&str, &str)] = &[
    ("EF-M22mm f/2 STM", "Canon EF-M 22mm f/2 STM"),
    (
        "iPhone 15 Pro Max back camera 6.765mm f/1.78",
        "iPhone 15 Pro Max 6.765mm f/1.78",
    ),
    ("NIKKOR Z 40mm f/2", "Nikkor Z 40mm f/2"),
];

fn to_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(raw, display)| (raw.to_string(), display.to_string()))
        .collect()
}

pub fn default_make_map() -> BTreeMap<String, String> {
    to_map(DEFAULT_MAKES)
}

pub fn default_model_map() -> BTreeMap<String, String> {
    to_map(DEFAULT_MODELS)
}

pub fn default_lens_map() -> BTreeMap<String, String> {
    to_map(DEFAULT_LENSES)
}

/// Map `value` through `table`.
///
/// Unmapped values pass through unchanged; when `warn_unknown` is set a
/// warning naming the table is logged. Never fails.
pub fn substitute(
    value: &str,
    table: &BTreeMap<String, String>,
    table_name: &str,
    warn_unknown: bool,
) -> String {
    match table.get(value) {
        Some(display) => display.clone(),
        None => {
            if warn_unknown {
                warn!(table = table_name, value, "value not in substitution table");
            }
            value.to_string()
        }
    }
}
