//! Audio file tag access.
//!
//! [`TagStore`] is the seam between the organizer and whatever library
//! parses audio tags. Production code uses [`LoftyTags`], built on the lofty
//! crate for format-independent metadata access (ID3v2, MP4 atoms, RIFF INFO,
//! ASF). Tests substitute an in-memory store.
//!
//! The raw representation ([`RawTag`]) never leaves the organizer's
//! `TagResolver`, which turns it into a defaulted `Tag`.

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Tag fields as the extraction library reports them, before defaulting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTag {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub title: Option<String>,
    pub track: Option<u32>,
}

/// Errors from the tag backend
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("Failed to read tags from {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to write tags to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl TagError {
    fn read(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Tag extraction and cover embedding for a single audio file.
///
/// Implementations are shared across blocking worker threads.
pub trait TagStore: Send + Sync {
    /// Read the raw tag fields of `path`.
    fn extract(&self, path: &Path) -> Result<RawTag, TagError>;

    /// Set `image` as the front cover of `path`, leaving other fields alone.
    fn embed_cover(&self, path: &Path, image: &[u8]) -> Result<(), TagError>;
}

/// [`TagStore`] backed by lofty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTags;

impl TagStore for LoftyTags {
    fn extract(&self, path: &Path) -> Result<RawTag, TagError> {
        let tagged_file = Probe::open(path)
            .map_err(|e| TagError::read(path, e))?
            .read()
            .map_err(|e| TagError::read(path, e))?;

        // Primary tag first, then the others, each only filling gaps
        let primary_type = tagged_file.primary_tag_type();
        let ordered = tagged_file.primary_tag().into_iter().chain(
            tagged_file
                .tags()
                .iter()
                .filter(|t| t.tag_type() != primary_type),
        );

        let mut raw = RawTag::default();
        for tag in ordered {
            raw.artist = raw.artist.or_else(|| text(tag.artist()));
            raw.album = raw.album.or_else(|| text(tag.album()));
            raw.year = raw.year.or_else(|| tag.year().map(|y| y.to_string()));
            raw.title = raw.title.or_else(|| text(tag.title()));
            raw.track = raw.track.or_else(|| tag.track());
        }
        Ok(raw)
    }

    fn embed_cover(&self, path: &Path, image: &[u8]) -> Result<(), TagError> {
        let mut tagged_file = Probe::open(path)
            .map_err(|e| TagError::write(path, e))?
            .read()
            .map_err(|e| TagError::write(path, e))?;

        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            // Seed the new tag so it does not shadow fields held in another one
            let mut fresh = Tag::new(tag_type);
            if let Some(existing) = tagged_file.first_tag() {
                copy_text_fields(existing, &mut fresh);
            }
            tagged_file.insert_tag(fresh);
        }
        let Some(tag) = tagged_file.tag_mut(tag_type) else {
            return Err(TagError::write(path, "format has no writable tag"));
        };

        tag.remove_picture_type(PictureType::CoverFront);
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(sniff_mime(image)),
            None,
            image.to_vec(),
        ));

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| TagError::write(path, e))
    }
}

fn text(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn copy_text_fields(from: &Tag, to: &mut Tag) {
    if let Some(artist) = text(from.artist()) {
        to.set_artist(artist);
    }
    if let Some(album) = text(from.album()) {
        to.set_album(album);
    }
    if let Some(title) = text(from.title()) {
        to.set_title(title);
    }
    if let Some(year) = from.year() {
        to.set_year(year);
    }
    if let Some(track) = from.track() {
        to.set_track(track);
    }
}

/// Guess the image type from its magic bytes. Anything not PNG is treated as JPEG.
fn sniff_mime(image: &[u8]) -> MimeType {
    if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        MimeType::Png
    } else {
        MimeType::Jpeg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FAKE_JPEG, write_silent_wav};
    use lofty::tag::TagType;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";

    /// A silent WAV whose only tag is of `tag_type`.
    fn tagged_wav(dir: &Path, tag_type: TagType) -> PathBuf {
        let path = write_silent_wav(dir, "song.wav");
        let mut tag = Tag::new(tag_type);
        tag.set_artist("Metallica".to_string());
        tag.set_album("Ride the Lightning".to_string());
        tag.set_title("Fight Fire with Fire".to_string());
        tag.set_track(3);
        tag.save_to_path(&path, WriteOptions::default())
            .expect("Failed to write test tag");
        path
    }

    fn front_covers(path: &Path) -> Vec<Vec<u8>> {
        let tagged_file = Probe::open(path).unwrap().read().unwrap();
        tagged_file
            .primary_tag()
            .map(|tag| {
                tag.pictures()
                    .iter()
                    .filter(|p| p.pic_type() == PictureType::CoverFront)
                    .map(|p| p.data().to_vec())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn assert_fields_intact(raw: &RawTag) {
        assert_eq!(raw.artist.as_deref(), Some("Metallica"));
        assert_eq!(raw.album.as_deref(), Some("Ride the Lightning"));
        assert_eq!(raw.title.as_deref(), Some("Fight Fire with Fire"));
        assert_eq!(raw.track, Some(3));
    }

    #[test]
    fn test_extract_reads_primary_tag() {
        let dir = tempdir().unwrap();
        let path = tagged_wav(dir.path(), TagType::Id3v2);

        assert_fields_intact(&LoftyTags.extract(&path).unwrap());
    }

    #[test]
    fn test_embed_keeps_fields_of_primary_tag() {
        let dir = tempdir().unwrap();
        let path = tagged_wav(dir.path(), TagType::Id3v2);

        LoftyTags.embed_cover(&path, FAKE_JPEG).unwrap();

        assert_fields_intact(&LoftyTags.extract(&path).unwrap());
        assert_eq!(front_covers(&path), vec![FAKE_JPEG.to_vec()]);
    }

    #[test]
    fn test_embed_keeps_fields_held_in_secondary_tag() {
        let dir = tempdir().unwrap();
        // RIFF INFO cannot hold pictures, so the cover lands in a new ID3v2 tag
        let path = tagged_wav(dir.path(), TagType::RiffInfo);
        assert_fields_intact(&LoftyTags.extract(&path).unwrap());

        LoftyTags.embed_cover(&path, FAKE_JPEG).unwrap();

        assert_fields_intact(&LoftyTags.extract(&path).unwrap());
        assert_eq!(front_covers(&path), vec![FAKE_JPEG.to_vec()]);
    }

    #[test]
    fn test_embed_replaces_previous_front_cover() {
        let dir = tempdir().unwrap();
        let path = tagged_wav(dir.path(), TagType::Id3v2);

        LoftyTags.embed_cover(&path, FAKE_PNG).unwrap();
        LoftyTags.embed_cover(&path, FAKE_JPEG).unwrap();

        assert_eq!(front_covers(&path), vec![FAKE_JPEG.to_vec()]);
    }

    #[test]
    fn test_untagged_file_extracts_empty_record() {
        let dir = tempdir().unwrap();
        let path = write_silent_wav(dir.path(), "bare.wav");

        assert_eq!(LoftyTags.extract(&path).unwrap(), RawTag::default());
    }

    #[test]
    fn test_extract_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write to temp file");

        let result = LoftyTags.extract(file.path());
        assert!(matches!(result, Err(TagError::Read { .. })));
    }

    #[test]
    fn test_extract_non_existent_file_returns_error() {
        let result = LoftyTags.extract(Path::new("non_existent_file.mp3"));
        assert!(result.is_err());
    }

    #[test]
    fn test_embed_into_non_audio_file_returns_write_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "Not an audio file").expect("Failed to write");

        let result = LoftyTags.embed_cover(file.path(), b"\xFF\xD8\xFF");
        assert!(matches!(result, Err(TagError::Write { .. })));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\n"), MimeType::Png);
        assert_eq!(sniff_mime(b"\xFF\xD8\xFF\xE0"), MimeType::Jpeg);
        assert_eq!(sniff_mime(b""), MimeType::Jpeg);
    }
}
