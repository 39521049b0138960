//! Shared test utilities for the artwork-manifest test suite.
//!
//! Provides fixture setup and lookup helpers that work with scan-phase data
//! structures (`Manifest`, `ArtworkRecord`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path(), &ManifestConfig::default()).unwrap();
//!
//! let art = find_artwork(&manifest, "Sunset Glow");
//! assert_eq!(art.category, "Illustration");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::ArtworkRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/artwork/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/artwork");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

/// A temp directory holding placeholder files with the given names.
///
/// Scanning only looks at names, so the contents are not real images.
pub fn dir_with_files(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in names {
        std::fs::write(tmp.path().join(name), "fake image").unwrap();
    }
    tmp
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find an artwork by title. Panics if not found.
pub fn find_artwork<'a>(manifest: &'a Manifest, title: &str) -> &'a ArtworkRecord {
    manifest
        .artworks
        .iter()
        .find(|a| a.title == title)
        .unwrap_or_else(|| {
            let titles = artwork_titles(manifest);
            panic!("artwork '{title}' not found. Available: {titles:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All artwork titles in manifest order.
pub fn artwork_titles(manifest: &Manifest) -> Vec<&str> {
    manifest.artworks.iter().map(|a| a.title.as_str()).collect()
}

/// All artwork `src` values in manifest order.
pub fn artwork_srcs(manifest: &Manifest) -> Vec<&str> {
    manifest.artworks.iter().map(|a| a.src.as_str()).collect()
}
