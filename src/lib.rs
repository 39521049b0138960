//! # Artwork Manifest
//!
//! Builds the JSON manifest behind a personal artwork gallery. The image
//! directory is the data source: each file name carries the artwork's date,
//! collection, category, title and tag, and the gallery front end reads the
//! manifest to render its grid, timeline and filters.
//!
//! # Pipeline
//!
//! ```text
//! pictures/artwork/  →  parse names  →  sort  →  data/artwork-manifest.json
//! ```
//!
//! The manifest is rebuilt from scratch every time. There is no incremental
//! update and no state beyond the one JSON file, so rerunning on an unchanged
//! directory writes byte-identical output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `date_collection_category_title_tag` file name parser |
//! | [`types`] | [`ArtworkRecord`](types::ArtworkRecord), one manifest entry |
//! | [`scan`] | Lists the directory, builds and sorts the [`Manifest`](scan::Manifest), writes it atomically |
//! | [`watch`] | Rebuilds on file arrival/removal, one event at a time |
//! | [`config`] | `artwork.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Names Never Fail
//!
//! A short or odd file name is not an error. Every missing field has a
//! default (`Uncategorized`, `Misc`, `Untitled`, empty tag, today's date), so
//! dropping any image into the directory always yields a gallery entry.
//!
//! ## Vocabulary As Config
//!
//! Category display names live in `artwork.toml`, not in code. Copies of the
//! gallery disagree on whether `comic` is a known category; the stock table
//! includes it, and a site that wants the shorter list declares it.
//!
//! ## Atomic Replace
//!
//! The browser may fetch the manifest while it is being rebuilt. Writing to
//! a temporary file and renaming it into place means a reader never sees a
//! truncated document.
//!
//! ## No Debouncing
//!
//! Each filesystem event triggers its own full rebuild. A portfolio holds a
//! few hundred images at most and a rebuild takes milliseconds, so
//! coalescing bursts has not been worth the latency. Large directories
//! would want it.

pub mod config;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;
