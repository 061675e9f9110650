//! Normalized per-file tag record.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::metadata::{RawTag, TagStore};

pub const DEFAULT_ARTIST: &str = "Various Artists";
pub const DEFAULT_ALBUM: &str = "Untitled Album";
pub const DEFAULT_YEAR: &str = "yyyy";
pub const DEFAULT_TITLE: &str = "Untitled";

/// Defaulted metadata for one audio file.
///
/// Display fields are never empty. `complete` is true only when every field,
/// track included, came from the file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub artist: String,
    pub album: String,
    pub year: String,
    pub title: String,
    pub track: Option<u32>,
    complete: bool,
}

impl Tag {
    /// Normalize raw fields, defaulting each missing one independently.
    pub fn from_raw(raw: RawTag) -> Self {
        let artist = non_blank(raw.artist);
        let album = non_blank(raw.album);
        let year = non_blank(raw.year);
        let title = non_blank(raw.title);
        let track = raw.track.filter(|&n| n > 0);

        let complete = artist.is_some()
            && album.is_some()
            && year.is_some()
            && title.is_some()
            && track.is_some();

        Self {
            artist: artist.unwrap_or_else(|| DEFAULT_ARTIST.to_string()),
            album: album.unwrap_or_else(|| DEFAULT_ALBUM.to_string()),
            year: year.unwrap_or_else(|| DEFAULT_YEAR.to_string()),
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            track,
            complete,
        }
    }

    /// Whether no default was applied to any field.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads tags through a [`TagStore`] and hands out [`Tag`] records.
#[derive(Clone)]
pub struct TagResolver {
    store: Arc<dyn TagStore>,
}

impl TagResolver {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    /// Resolve the tag of `path`. A read failure is returned as-is, with no
    /// defaulting.
    pub fn resolve(&self, path: &Path) -> Result<Tag> {
        let raw = self.store.extract(path)?;
        Ok(Tag::from_raw(raw))
    }
}
