//! Filename parsing for the `date_collection_category_title_tag` convention.
//!
//! Every artwork carries its metadata in its file name. After the extension
//! is stripped, the stem is split on `_` into up to five tokens:
//!
//! ```text
//! 2024-03-10_my-series_illus_sunset-glow_warm.png
//! └─ date ─┘ └collection┘ └cat┘ └─ title ─┘ └tag┘
//! ```
//!
//! Any token after the first may be left off by truncating the name
//! (`2024-01-01_myseries.png` supplies only date and collection). Missing
//! tokens fall back to defaults; parsing never fails.
//!
//! ## Display Text
//!
//! - `collection` is word-capitalized as-is. Hyphens stay hyphens:
//!   `my-series` → "My-series".
//! - `title` and `tag` have hyphens turned into spaces first:
//!   `sunset-glow` → "Sunset Glow".
//! - `category` is looked up in the category vocabulary; tokens with no
//!   entry are word-capitalized instead.

use std::collections::BTreeMap;

/// Collection used when the name has no collection token.
pub const DEFAULT_COLLECTION: &str = "uncategorized";
/// Category token used when the name has no category token.
pub const DEFAULT_CATEGORY: &str = "misc";
/// Title used when the name has no title token.
pub const UNTITLED: &str = "Untitled";

/// Display fields extracted from one artwork file name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    pub date: String,
    pub collection: String,
    pub category: String,
    pub title: String,
    /// Empty when the name has no tag token.
    pub tag: String,
}

/// Parse an artwork file name into its display fields.
///
/// `today` is substituted when the date token is missing or empty; callers
/// pass the build date so every record in one build agrees on it.
///
/// - `"2024-03-10_my-series_illus_sunset-glow_warm.png"` → date="2024-03-10",
///   collection="My-series", category="Illustration", title="Sunset Glow", tag="Warm"
/// - `"2024-01-01_misc.jpg"` → collection="Misc", category="Misc", title="Untitled", tag=""
/// - `"2023-05-05_x_unknown-cat_foo.gif"` → category="Unknown-cat", title="Foo"
pub fn parse_artwork_name(
    file_name: &str,
    vocabulary: &BTreeMap<String, String>,
    today: &str,
) -> ParsedName {
    let stem = strip_extension(file_name);
    let tokens: Vec<&str> = stem.split('_').collect();
    let non_empty = |i: usize| tokens.get(i).copied().filter(|t| !t.is_empty());

    let date = non_empty(0).unwrap_or(today).to_string();
    let collection = capitalize_words(non_empty(1).unwrap_or(DEFAULT_COLLECTION));

    let raw_category = non_empty(2).unwrap_or(DEFAULT_CATEGORY).to_lowercase();
    let category = vocabulary
        .get(&raw_category)
        .cloned()
        .unwrap_or_else(|| capitalize_words(&raw_category));

    // A present-but-empty title or tag token (`a_b_c__d`) stays empty rather
    // than falling back, matching how the gallery has always read these names.
    let title = tokens
        .get(3)
        .map(|t| display_words(t))
        .unwrap_or_else(|| UNTITLED.to_string());
    let tag = tokens.get(4).map(|t| display_words(t)).unwrap_or_default();

    ParsedName {
        date,
        collection,
        category,
        title,
        tag,
    }
}

/// Strip everything after the final `.`, if anything follows it.
///
/// - `"a_b.png"` → `"a_b"`
/// - `"archive.tar.gz"` → `"archive.tar"`
/// - `"trailing."` → `"trailing."`
/// - `".png"` → `""`
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => &file_name[..dot],
        _ => file_name,
    }
}

/// Uppercase the first character of each space-separated word and lowercase
/// the rest. Words are split on single spaces, so runs of spaces survive.
pub fn capitalize_words(input: &str) -> String {
    input
        .split(' ')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Hyphens become spaces, then each word is capitalized.
fn display_words(token: &str) -> String {
    capitalize_words(&token.replace('-', " "))
}
