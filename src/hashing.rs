//! Short identity digests used to build cache keys.
//!
//! Both digests are SHAKE256 outputs truncated to a fixed length and rendered
//! as lowercase hex:
//!
//! | Digest | Input | Output |
//! |---|---|---|
//! | [`source_file_hash`] | source path relative to the configured root | 8 bytes → 16 hex chars |
//! | [`config_hash`] | canonical JSON of the defaulted [`ProcessorConfig`] | 4 bytes → 8 hex chars |
//!
//! Source identity is **path-based**: editing a file in place keeps its hash,
//! so its cache entry is reused. Only a path change (relative to the root) or
//! a processor config change produces a new cache entry.

use crate::config::ProcessorConfig;
use sha3::Shake256;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use std::path::{Component, Path, PathBuf};

const SOURCE_HASH_BYTES: usize = 8;
const CONFIG_HASH_BYTES: usize = 4;

/// SHAKE256 of `data`, truncated to `N` bytes, as lowercase hex.
fn shake256_hex<const N: usize>(data: &[u8]) -> String {
    let mut hasher = Shake256::default();
    hasher.update(data);
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; N];
    reader.read(&mut out);
    out.iter().map(|b| format!("{b:02x}")).collect()
}

/// Hash of `file`'s path relative to `root` (16 hex chars).
///
/// Pure: the filesystem is never touched. Relative inputs are interpreted
/// against the current working directory, so `root` and `file` may be mixed
/// absolute/relative.
pub fn source_file_hash(root: &Path, file: &Path) -> String {
    let relative = relative_path(root, file);
    shake256_hex::<SOURCE_HASH_BYTES>(relative.as_bytes())
}

/// Hash of the canonical JSON form of a processor config (8 hex chars).
///
/// The JSON is produced from the typed struct, so field order is fixed by the
/// struct definition and two configs parsed from differently ordered TOML or
/// JSON hash identically.
pub fn config_hash(config: &ProcessorConfig) -> String {
    let json = serde_json::to_vec(config).expect("processor config must serialize");
    shake256_hex::<CONFIG_HASH_BYTES>(&json)
}

/// Lexical relative path from `root` to `file`, `/`-separated.
///
/// Walks up with `..` when `file` is not
/// below `root`, and returns an empty string when both are the same path.
pub fn relative_path(root: &Path, file: &Path) -> String {
    let root = normalize(root);
    let file = normalize(file);

    let root_parts: Vec<Component> = root.components().collect();
    let file_parts: Vec<Component> = file.components().collect();
    let common = root_parts
        .iter()
        .zip(&file_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = std::iter::repeat_n("..".to_string(), root_parts.len() - common);
    let downs = file_parts[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());
    ups.chain(downs).collect::<Vec<_>>().join("/")
}

/// Make `path` absolute and resolve `.`/`..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResizeKernel;

    #[test]
    fn source_hash_is_16_hex_chars() {
        let h = source_file_hash(Path::new("/photos"), Path::new("/photos/trip/a.jpg"));
        assert_eq!(h.len(), 16);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn source_hash_depends_only_on_relative_path() {
        let a = source_file_hash(Path::new("/photos"), Path::new("/photos/trip/a.jpg"));
        let b = source_file_hash(
            Path::new("/mirror/photos"),
            Path::new("/mirror/photos/trip/a.jpg"),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn source_hash_changes_with_path() {
        let a = source_file_hash(Path::new("/photos"), Path::new("/photos/a.jpg"));
        let b = source_file_hash(Path::new("/photos"), Path::new("/photos/b.jpg"));
        assert_ne!(a, b);
    }

    #[test]
    fn source_hash_matches_shake256_of_relative_path() {
        let h = source_file_hash(Path::new("/photos"), Path::new("/photos/trip/a.jpg"));
        assert_eq!(h, shake256_hex::<8>(b"trip/a.jpg"));
    }

    #[test]
    fn shake256_known_vector() {
        // SHAKE256("") first 8 bytes
        assert_eq!(shake256_hex::<8>(b""), "46b9dd2b0ba88d13");
    }

    #[test]
    fn relative_path_inside_root() {
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/b/c/d.jpg")),
            "c/d.jpg"
        );
    }

    #[test]
    fn relative_path_outside_root() {
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/x/d.jpg")),
            "../x/d.jpg"
        );
    }

    #[test]
    fn relative_path_same_path_is_empty() {
        assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/b")), "");
    }

    #[test]
    fn relative_path_resolves_dot_segments() {
        assert_eq!(
            relative_path(Path::new("/a/./b"), Path::new("/a/b/../b/c.jpg")),
            "c.jpg"
        );
    }

    #[test]
    fn config_hash_is_8_hex_chars() {
        let h = config_hash(&ProcessorConfig::default());
        assert_eq!(h.len(), 8);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn config_hash_deterministic() {
        assert_eq!(
            config_hash(&ProcessorConfig::default()),
            config_hash(&ProcessorConfig::default())
        );
    }

    #[test]
    fn config_hash_ignores_key_order() {
        let a: ProcessorConfig =
            serde_json::from_str(r#"{"variants":[100,200],"strip_gps":true}"#).unwrap();
        let b: ProcessorConfig =
            serde_json::from_str(r#"{"strip_gps":true,"variants":[100,200]}"#).unwrap();
        assert_eq!(config_hash(&a), config_hash(&b));
    }

    #[test]
    fn config_hash_changes_with_every_field() {
        let base = ProcessorConfig::default();
        let base_hash = config_hash(&base);

        let variants = ProcessorConfig {
            variants: vec![320],
            ..base.clone()
        };
        let kernel = ProcessorConfig {
            resize_kernel: ResizeKernel::Nearest,
            ..base.clone()
        };
        let gamma = ProcessorConfig {
            resize_gamma: Some(2.2),
            ..base.clone()
        };
        let gps = ProcessorConfig {
            strip_gps: true,
            ..base.clone()
        };

        for changed in [variants, kernel, gamma, gps] {
            assert_ne!(config_hash(&changed), base_hash, "{changed:?}");
        }
    }
}
