//! Test utilities and fixtures for music-organizer tests.
//!
//! The fakes here stand in for the external collaborators:
//!
//! - [`FakeTags`]: a [`TagStore`] keyed by file *contents*, so a file keeps
//!   its tags no matter how often it is moved or renamed
//! - [`FakeLookup`]: a [`CoverLookup`] with canned answers per (artist, album)
//! - [`FakeDownloader`]: an [`ImageDownloader`] that writes placeholder bytes
//!
//! # Example
//!
//! ```ignore
//! let dir = tempfile::tempdir().unwrap();
//! write_file(dir.path(), "trackA.mp3", "metallica-01");
//! let tags = FakeTags::new().with_tag("metallica-01", full_raw_tag());
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::enrichment::{CoverLookup, EnrichmentError, ImageDownloader};
use crate::metadata::{RawTag, TagError, TagStore};

/// Placeholder image data written by [`FakeDownloader`].
pub const FAKE_JPEG: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg";

/// The tag from the classic end-to-end example.
pub fn full_raw_tag() -> RawTag {
    RawTag {
        artist: Some("Metallica".to_string()),
        album: Some("Ride the Lightning".to_string()),
        year: Some("1984".to_string()),
        title: Some("Fight Fire with Fire".to_string()),
        track: Some(1),
    }
}

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Write a tenth of a second of untagged 16-bit mono PCM silence.
pub fn write_silent_wav(root: &Path, relative: &str) -> PathBuf {
    const SAMPLE_RATE: u32 = 8000;
    let data = vec![0u8; (SAMPLE_RATE / 10 * 2) as usize];

    let mut wav = Vec::with_capacity(44 + data.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data.len() as u32).to_le_bytes());
    wav.extend_from_slice(&data);

    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(&path, wav).expect("Failed to write test WAV");
    path
}

/// In-memory [`TagStore`]. A file's contents select its tag.
#[derive(Default)]
pub struct FakeTags {
    tags: HashMap<String, RawTag>,
    broken: HashSet<String>,
    unwritable: HashSet<String>,
    embedded: Mutex<Vec<PathBuf>>,
}

impl FakeTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files containing `key` resolve to `tag`.
    pub fn with_tag(mut self, key: &str, tag: RawTag) -> Self {
        self.tags.insert(key.to_string(), tag);
        self
    }

    /// Files containing `key` fail extraction.
    pub fn with_broken(mut self, key: &str) -> Self {
        self.broken.insert(key.to_string());
        self
    }

    /// Files containing `key` read fine but reject cover embedding.
    pub fn with_unwritable(mut self, key: &str) -> Self {
        self.unwritable.insert(key.to_string());
        self
    }

    /// Paths that received a cover, in call order.
    pub fn embedded(&self) -> Vec<PathBuf> {
        self.embedded.lock().clone()
    }

    fn key(path: &Path) -> Result<String, TagError> {
        std::fs::read_to_string(path).map_err(|e| TagError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl TagStore for FakeTags {
    fn extract(&self, path: &Path) -> Result<RawTag, TagError> {
        let key = Self::key(path)?;
        if self.broken.contains(&key) {
            return Err(TagError::Read {
                path: path.to_path_buf(),
                message: "corrupt frame header".to_string(),
            });
        }
        self.tags.get(&key).cloned().ok_or_else(|| TagError::Read {
            path: path.to_path_buf(),
            message: "no recognizable tag".to_string(),
        })
    }

    fn embed_cover(&self, path: &Path, _image: &[u8]) -> Result<(), TagError> {
        let key = Self::key(path)?;
        if self.unwritable.contains(&key) {
            return Err(TagError::Write {
                path: path.to_path_buf(),
                message: "read-only".to_string(),
            });
        }
        self.embedded.lock().push(path.to_path_buf());
        Ok(())
    }
}

/// [`CoverLookup`] with canned per-album answers. Unknown albums are `NoMatches`.
#[derive(Default)]
pub struct FakeLookup {
    answers: HashMap<(String, String), Result<String, EnrichmentError>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cover(mut self, artist: &str, album: &str, url: &str) -> Self {
        self.answers
            .insert((artist.to_string(), album.to_string()), Ok(url.to_string()));
        self
    }

    pub fn with_error(mut self, artist: &str, album: &str, error: EnrichmentError) -> Self {
        self.answers
            .insert((artist.to_string(), album.to_string()), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CoverLookup for FakeLookup {
    async fn cover_url(&self, artist: &str, album: &str) -> Result<String, EnrichmentError> {
        let key = (artist.to_string(), album.to_string());
        self.calls.lock().push(key.clone());
        self.answers
            .get(&key)
            .cloned()
            .unwrap_or(Err(EnrichmentError::NoMatches))
    }
}

/// [`ImageDownloader`] writing [`FAKE_JPEG`]. URLs containing "broken" fail.
#[derive(Default)]
pub struct FakeDownloader {
    downloads: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().clone()
    }
}

#[async_trait]
impl ImageDownloader for FakeDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), EnrichmentError> {
        self.downloads.lock().push(url.to_string());
        if url.contains("broken") {
            return Err(EnrichmentError::Network("connection reset".to_string()));
        }
        std::fs::write(dest, FAKE_JPEG).map_err(|e| EnrichmentError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fake_tags_follow_file_contents() {
        let dir = tempdir().unwrap();
        let original = write_file(dir.path(), "a.mp3", "key-1");
        let tags = FakeTags::new().with_tag("key-1", full_raw_tag());

        let moved = dir.path().join("renamed.mp3");
        std::fs::rename(&original, &moved).unwrap();

        assert_eq!(tags.extract(&moved).unwrap(), full_raw_tag());
    }

    #[test]
    fn test_fake_tags_broken_and_unknown() {
        let dir = tempdir().unwrap();
        let broken = write_file(dir.path(), "b.mp3", "bad");
        let unknown = write_file(dir.path(), "c.mp3", "???");
        let tags = FakeTags::new().with_broken("bad");

        assert!(tags.extract(&broken).is_err());
        assert!(tags.extract(&unknown).is_err());
    }

    #[tokio::test]
    async fn test_fake_lookup_defaults_to_no_matches() {
        let lookup = FakeLookup::new().with_cover("A", "B", "https://img/1.jpg");

        assert_eq!(lookup.cover_url("A", "B").await.unwrap(), "https://img/1.jpg");
        assert!(matches!(
            lookup.cover_url("A", "C").await,
            Err(EnrichmentError::NoMatches)
        ));
        assert_eq!(lookup.calls().len(), 2);
    }
}
