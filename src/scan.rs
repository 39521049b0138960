//! Directory scanning and manifest generation.
//!
//! Lists the artwork directory, keeps the image files, parses each file name
//! into an [`ArtworkRecord`], sorts the records, and writes them as a single
//! JSON array the gallery front end fetches.
//!
//! ## Ordering
//!
//! Records are sorted newest first by `date`, then by `title`:
//!
//! - `date` is read as an ISO calendar date (`YYYY-MM-DD`, or the shorter
//!   `YYYY-MM` / `YYYY`). Dates that do not parse sort after every valid date.
//! - Titles compare with Unicode collation in the root locale: accents and
//!   case only matter when the base letters tie, and lowercase comes first.
//! - `src` breaks any remaining tie, so the order never depends on the order
//!   the filesystem happened to list entries in.
//!
//! ## Writing
//!
//! The manifest is always rebuilt from scratch and replaces the previous file
//! wholesale. The JSON goes to a temporary file next to the target and is
//! renamed over it, so a reader sees either the old document or the new one.
//! A directory that cannot be listed aborts the build before anything is
//! written.

use crate::config::ManifestConfig;
use crate::naming::parse_artwork_name;
use crate::types::ArtworkRecord;
use chrono::{NaiveDate, Utc};
use feruca::{Collator, Tailoring};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of the temporary file the manifest is staged in before the rename.
pub const TEMP_FILE_PREFIX: &str = ".artwork-manifest";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot list directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The ordered list of artworks, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub artworks: Vec<ArtworkRecord>,
}

impl Manifest {
    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    /// Pretty-printed JSON, two-space indented, no trailing newline.
    pub fn to_json(&self) -> Result<String, ScanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a previously written manifest.
    pub fn read(path: &Path) -> Result<Self, ScanError> {
        let content = fs::read_to_string(path).map_err(|source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace the file at `path` with this manifest.
    ///
    /// Creates the parent directory if needed. The content is staged in a
    /// temporary file in the same directory, flushed to disk, then renamed
    /// over `path`.
    pub fn write(&self, path: &Path) -> Result<(), ScanError> {
        let json = self.to_json()?;
        let write_err = |source: io::Error| ScanError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(write_err)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX).suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Served as a static asset, so it has to stay world-readable.
            builder.permissions(fs::Permissions::from_mode(0o644));
        }
        let mut staged = builder.tempfile_in(dir).map_err(write_err)?;
        staged.write_all(json.as_bytes()).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;
        staged.persist(path).map_err(|e| write_err(e.error))?;

        debug!("wrote {} artworks to {}", self.len(), path.display());
        Ok(())
    }
}

/// Scan `dir` and return the sorted manifest, dating undated files today (UTC).
pub fn scan(dir: &Path, config: &ManifestConfig) -> Result<Manifest, ScanError> {
    scan_at(dir, config, Utc::now().date_naive())
}

/// Scan `dir`, using `today` for file names that carry no date.
pub fn scan_at(
    dir: &Path,
    config: &ManifestConfig,
    today: NaiveDate,
) -> Result<Manifest, ScanError> {
    let today = today.format("%Y-%m-%d").to_string();

    let mut artworks: Vec<ArtworkRecord> = collect_image_names(dir, config)?
        .into_iter()
        .map(|name| {
            let parsed = parse_artwork_name(&name, &config.categories, &today);
            ArtworkRecord::new(config.public_src(&name), parsed)
        })
        .collect();

    sort_artworks(&mut artworks);
    Ok(Manifest { artworks })
}

/// Scan `dir` and replace the manifest at `manifest_path` with the result.
///
/// Nothing is written if the directory cannot be listed.
pub fn build(
    dir: &Path,
    manifest_path: &Path,
    config: &ManifestConfig,
) -> Result<Manifest, ScanError> {
    let manifest = scan(dir, config)?;
    manifest.write(manifest_path)?;
    Ok(manifest)
}

/// Image file names directly inside `dir`, in name order.
fn collect_image_names(dir: &Path, config: &ManifestConfig) -> Result<Vec<String>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|source| ScanError::ListDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| match e.file_name().into_string() {
            Ok(name) => Some(name),
            Err(raw) => {
                debug!("skipping non UTF-8 file name {raw:?}");
                None
            }
        })
        .filter(|name| is_image_name(name, config))
        .collect();

    names.sort();
    Ok(names)
}

fn is_image_name(name: &str, config: &ManifestConfig) -> bool {
    name.rfind('.')
        .map(|dot| config.is_image_extension(&name[dot + 1..]))
        .unwrap_or(false)
}

/// Sort newest first, then by title, then by `src`.
pub fn sort_artworks(artworks: &mut [ArtworkRecord]) {
    let mut titles = title_collator();
    artworks.sort_by(|a, b| {
        let a_date = parse_sort_date(&a.date);
        let b_date = parse_sort_date(&b.date);
        // `None` orders below every date, so reversing puts unparseable dates last.
        b_date
            .cmp(&a_date)
            .then_with(|| titles.collate(a.title.as_str(), b.title.as_str()))
            .then_with(|| a.src.cmp(&b.src))
    });
}

/// Read a record date as a calendar date.
///
/// - `"2024-03-10"` → 2024-03-10
/// - `"2024-03"` → 2024-03-01
/// - `"2024"` → 2024-01-01
/// - `"someday"`, `"2024-02-30"` → None
pub fn parse_sort_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{date}-01-01"), "%Y-%m-%d"))
        .ok()
}

/// Root-locale Unicode collation with spaces and punctuation kept significant,
/// the same order a browser's default `localeCompare` gives.
fn title_collator() -> Collator {
    Collator::new(Tailoring::default(), false, true)
}
