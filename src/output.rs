//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output leads with what the gallery will show (year, title, labels)
//! with the public `src` as an indented context line. This makes `check`
//! output readable as an inventory of the portfolio.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! 2024
//! 001 Walk Cycle
//!     Source: /pictures/artwork/2024-06-01_loops_anim_walk-cycle_wip.gif
//!     2024-06-01 · Loops · Animation · Wip
//! 2023
//! 001 Crow
//!     ...
//!
//! Collections
//!     Loops (1)
//!     My-series (2)
//!
//! Categories
//!     Animation (1)
//!     Illustration (2)
//! ```
//!
//! ## Build and Watch
//!
//! ```text
//! Updated manifest with 7 artworks → data/artwork-manifest.json
//! + New file detected: pictures/artwork/2024-07-01_loops_anim_run.gif
//! - File removed: pictures/artwork/2024-01-01_misc.jpg
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns lines for testability and has a
//! `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::scan::Manifest;
use crate::types::ArtworkRecord;
use crate::watch::ChangeEvent;
use std::collections::BTreeMap;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Date, collection, category and tag joined for a single context line.
fn labels_line(art: &ArtworkRecord) -> String {
    let mut labels = vec![art.date.as_str(), art.collection.as_str(), art.category.as_str()];
    if !art.tag.is_empty() {
        labels.push(art.tag.as_str());
    }
    labels.join(" · ")
}

/// Count artworks per label, alphabetically.
fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

// ============================================================================
// Check: full inventory
// ============================================================================

/// Format the manifest grouped by year the way the gallery timeline shows it,
/// followed by the collection and category filters it offers.
pub fn format_inventory(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    if manifest.is_empty() {
        lines.push("No artworks found".to_string());
        return lines;
    }

    let mut current_year: Option<&str> = None;
    let mut position = 0;
    for art in &manifest.artworks {
        if current_year != Some(art.year()) {
            current_year = Some(art.year());
            position = 0;
            lines.push(art.year().to_string());
        }
        position += 1;
        lines.push(format!("{} {}", format_index(position), art.title));
        lines.push(format!("{}Source: {}", indent(1), art.src));
        lines.push(format!("{}{}", indent(1), labels_line(art)));
    }

    lines.push(String::new());
    lines.push("Collections".to_string());
    for (name, count) in tally(manifest.artworks.iter().map(|a| a.collection.as_str())) {
        lines.push(format!("{}{} ({})", indent(1), name, count));
    }

    lines.push(String::new());
    lines.push("Categories".to_string());
    for (name, count) in tally(manifest.artworks.iter().map(|a| a.category.as_str())) {
        lines.push(format!("{}{} ({})", indent(1), name, count));
    }

    lines
}

pub fn print_inventory(manifest: &Manifest) {
    for line in format_inventory(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Build and watch
// ============================================================================

/// One-line summary after the manifest has been written.
pub fn format_build_summary(manifest: &Manifest, manifest_path: &Path) -> String {
    let noun = if manifest.len() == 1 { "artwork" } else { "artworks" };
    format!(
        "Updated manifest with {} {} → {}",
        manifest.len(),
        noun,
        manifest_path.display()
    )
}

pub fn print_build_summary(manifest: &Manifest, manifest_path: &Path) {
    println!("{}", format_build_summary(manifest, manifest_path));
}

/// Announce the change that is about to trigger a rebuild.
pub fn format_change_event(change: &ChangeEvent) -> String {
    match change {
        ChangeEvent::Added(path) => format!("+ New file detected: {}", path.display()),
        ChangeEvent::Removed(path) => format!("- File removed: {}", path.display()),
    }
}

pub fn print_change_event(change: &ChangeEvent) {
    println!("{}", format_change_event(change));
}
