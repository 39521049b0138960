//! The artwork record serialized into the manifest.
//!
//! The gallery front end reads these fields by name, so their names and
//! order are part of the manifest format.

use crate::naming::ParsedName;
use serde::{Deserialize, Serialize};

/// One artwork, derived entirely from its image file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    /// Public path to the image (prefix + file name). Unique per record.
    pub src: String,
    /// `YYYY-MM-DD`, used for display and as the primary sort key.
    pub date: String,
    pub collection: String,
    pub category: String,
    pub title: String,
    /// Free-text annotation; empty when the file name has none.
    pub tag: String,
}

impl ArtworkRecord {
    pub fn new(src: String, parsed: ParsedName) -> Self {
        Self {
            src,
            date: parsed.date,
            collection: parsed.collection,
            category: parsed.category,
            title: parsed.title,
            tag: parsed.tag,
        }
    }

    /// Year segment of the date, as the gallery timeline groups by it.
    pub fn year(&self) -> &str {
        self.date.split('-').next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> ArtworkRecord {
        ArtworkRecord {
            src: "/pictures/artwork/x.png".to_string(),
            date: date.to_string(),
            collection: "A".to_string(),
            category: "Misc".to_string(),
            title: "Untitled".to_string(),
            tag: String::new(),
        }
    }

    #[test]
    fn year_is_first_date_segment() {
        assert_eq!(record("2024-03-10").year(), "2024");
        assert_eq!(record("someday").year(), "someday");
        assert_eq!(record("").year(), "");
    }

    #[test]
    fn fields_serialize_in_manifest_order() {
        let json = serde_json::to_string(&record("2024-03-10")).unwrap();
        assert_eq!(
            json,
            r#"{"src":"/pictures/artwork/x.png","date":"2024-03-10","collection":"A","category":"Misc","title":"Untitled","tag":""}"#
        );
    }
}
