//! Manifest configuration.
//!
//! Handles loading, validating, and merging `artwork.toml`. The file is
//! optional: stock defaults reproduce the layout the gallery front end
//! expects, and a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "pictures/artwork"             # Directory of artwork images
//! manifest_path = "data/artwork-manifest.json" # Where the manifest is written
//! public_prefix = "/pictures/artwork"         # Prefix for each record's `src`
//! image_extensions = ["png", "jpg", "jpeg", "webp", "gif"]
//!
//! [categories]
//! illus = "Illustration"
//! anim = "Animation"
//! comic = "Comic"
//! sketch = "Sketch"
//! misc = "Misc"
//! ```
//!
//! ## Merging
//!
//! Scalar keys and arrays override the stock value. The `[categories]`
//! table is the exception: a user table replaces the stock vocabulary as a
//! whole, so entries can be dropped as well as added. Some copies of the
//! gallery ship without the `comic` entry; listing only the other four
//! reproduces that vocabulary.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILENAME: &str = "artwork.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Manifest configuration loaded from `artwork.toml`.
///
/// Relative paths are resolved against the project root by
/// [`source_dir_in`](Self::source_dir_in) and
/// [`manifest_path_in`](Self::manifest_path_in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Directory scanned for artwork images (not recursive).
    pub source_dir: PathBuf,
    /// File the manifest JSON is written to.
    pub manifest_path: PathBuf,
    /// Public URL path each record's `src` starts with.
    pub public_prefix: String,
    /// File extensions treated as images, compared case-insensitively.
    pub image_extensions: Vec<String>,
    /// Category vocabulary: lowercase file-name token → display name.
    pub categories: BTreeMap<String, String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("pictures/artwork"),
            manifest_path: PathBuf::from("data/artwork-manifest.json"),
            public_prefix: "/pictures/artwork".to_string(),
            image_extensions: ["png", "jpg", "jpeg", "webp", "gif"]
                .into_iter()
                .map(String::from)
                .collect(),
            categories: default_categories(),
        }
    }
}

fn default_categories() -> BTreeMap<String, String> {
    [
        ("illus", "Illustration"),
        ("anim", "Animation"),
        ("comic", "Comic"),
        ("sketch", "Sketch"),
        ("misc", "Misc"),
    ]
    .into_iter()
    .map(|(token, name)| (token.to_string(), name.to_string()))
    .collect()
}

impl ManifestConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "image_extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .image_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains('.'))
        {
            return Err(ConfigError::Validation(format!(
                "image_extensions entry {bad:?} must be a bare extension like \"png\""
            )));
        }
        if self.manifest_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "manifest_path must not be empty".into(),
            ));
        }
        if let Some((token, _)) = self.categories.iter().find(|(_, name)| name.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "categories.{token} must have a display name"
            )));
        }
        Ok(())
    }

    /// Whether a file extension (without the dot) names an image.
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }

    /// Public `src` for a file name: the prefix and name joined by one `/`.
    pub fn public_src(&self, file_name: &str) -> String {
        let prefix = self.public_prefix.trim_end_matches('/');
        format!("{prefix}/{file_name}")
    }

    pub fn source_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.source_dir)
    }

    pub fn manifest_path_in(&self, root: &Path) -> PathBuf {
        root.join(&self.manifest_path)
    }

    /// Lowercase category tokens so lookups match however the file spells them.
    fn normalize(mut self) -> Self {
        self.categories = self
            .categories
            .into_iter()
            .map(|(token, name)| (token.to_lowercase(), name))
            .collect();
        self
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ManifestConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ManifestConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => {
            let mut base = base;
            // The vocabulary is replaced, never merged entry by entry.
            if let (toml::Value::Table(base_table), Some(_)) = (&mut base, ov.get("categories")) {
                base_table.remove("categories");
            }
            merge_toml(base, ov)
        }
        None => base,
    };
    let config: ManifestConfig = merged.try_into()?;
    let config = config.normalize();
    config.validate()?;
    Ok(config)
}

/// Load config from a specific file, falling back to stock defaults when
/// the file does not exist.
pub fn load_config_file(config_path: &Path) -> Result<ManifestConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(config_path)?;
    resolve_config(base, overlay)
}

/// Load config from `artwork.toml` in the given project root.
pub fn load_config(root: &Path) -> Result<ManifestConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILENAME))
}

/// Returns a fully-commented stock `artwork.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Artwork Manifest Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory holding the artwork images, relative to the project root.
# Only files directly inside it are listed; subdirectories are skipped.
source_dir = "pictures/artwork"

# Where the manifest JSON is written, relative to the project root.
# The gallery fetches this file as a static asset.
manifest_path = "data/artwork-manifest.json"

# Public URL path for the images. Each record's `src` is this prefix,
# a slash, and the file name.
public_prefix = "/pictures/artwork"

# File extensions treated as artwork images (matched case-insensitively).
image_extensions = ["png", "jpg", "jpeg", "webp", "gif"]

# ---------------------------------------------------------------------------
# Category vocabulary
# ---------------------------------------------------------------------------
# Maps the third file-name token to a display name. Tokens without an entry
# are shown word-capitalized (e.g. "oil-paint" -> "Oil-paint").
#
# A [categories] table here replaces this whole list rather than adding to
# it, so copy every entry you want to keep.
[categories]
illus = "Illustration"
anim = "Animation"
comic = "Comic"
sketch = "Sketch"
misc = "Misc"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_gallery_layout() {
        let config = ManifestConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("pictures/artwork"));
        assert_eq!(
            config.manifest_path,
            PathBuf::from("data/artwork-manifest.json")
        );
        assert_eq!(config.public_prefix, "/pictures/artwork");
        assert_eq!(config.image_extensions.len(), 5);
    }

    #[test]
    fn default_vocabulary_includes_comic() {
        let config = ManifestConfig::default();
        assert_eq!(config.categories.len(), 5);
        assert_eq!(config.categories["comic"], "Comic");
        assert_eq!(config.categories["illus"], "Illustration");
    }

    #[test]
    fn image_extension_match_ignores_case() {
        let config = ManifestConfig::default();
        assert!(config.is_image_extension("png"));
        assert!(config.is_image_extension("JPEG"));
        assert!(config.is_image_extension("WebP"));
        assert!(!config.is_image_extension("txt"));
        assert!(!config.is_image_extension("tiff"));
    }

    #[test]
    fn public_src_joins_with_single_slash() {
        let mut config = ManifestConfig::default();
        assert_eq!(config.public_src("a.png"), "/pictures/artwork/a.png");

        config.public_prefix = "/art/".to_string();
        assert_eq!(config.public_src("a.png"), "/art/a.png");
    }

    #[test]
    fn paths_resolve_against_root() {
        let config = ManifestConfig::default();
        let root = Path::new("/srv/site");
        assert_eq!(
            config.source_dir_in(root),
            PathBuf::from("/srv/site/pictures/artwork")
        );
        assert_eq!(
            config.manifest_path_in(root),
            PathBuf::from("/srv/site/data/artwork-manifest.json")
        );
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, ManifestConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
source_dir = "art"
public_prefix = "/art"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("art"));
        assert_eq!(config.public_prefix, "/art");
        // Unspecified values should be defaults
        assert_eq!(
            config.manifest_path,
            PathBuf::from("data/artwork-manifest.json")
        );
        assert_eq!(config.categories.len(), 5);
    }

    #[test]
    fn categories_table_replaces_stock_vocabulary() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[categories]
illus = "Illustration"
anim = "Animation"
sketch = "Sketch"
misc = "Misc"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.categories.len(), 4);
        assert!(!config.categories.contains_key("comic"));
    }

    #[test]
    fn category_tokens_are_lowercased() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[categories]
Paint = "Painting"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.categories["paint"], "Painting");
    }

    #[test]
    fn load_config_file_at_custom_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.toml");
        fs::write(&path, "manifest_path = \"out/manifest.json\"\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.manifest_path, PathBuf::from("out/manifest.json"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn empty_extensions_rejected() {
        let config = ManifestConfig {
            image_extensions: vec![],
            ..ManifestConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn dotted_extension_rejected() {
        let config = ManifestConfig {
            image_extensions: vec![".png".to_string()],
            ..ManifestConfig::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains(".png"));
    }

    #[test]
    fn empty_category_name_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[categories]\nillus = \"\"\n",
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ManifestConfig, _> = toml::from_str("sourc_dir = \"art\"\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_array_replaced() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("image_extensions = [\"png\"]\n").unwrap();
        let merged = merge_toml(base, overlay);
        let exts = merged.get("image_extensions").unwrap().as_array().unwrap();
        assert_eq!(exts.len(), 1);
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ManifestConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ManifestConfig::default());
    }
}
