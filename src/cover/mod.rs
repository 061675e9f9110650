//! Album cover art.
//!
//! Each album directory gets its cover twice: as a sidecar image named
//! [`COVER_FILENAME`] and as the front-cover picture embedded in the tags of
//! every audio file in the directory.
//!
//! A directory already holding [`COVER_FILENAME`] is left alone, which makes
//! repeated runs cheap.

pub mod pipeline;

pub use pipeline::{ArtFetcher, ArtOptions, ArtRun};

/// Sidecar name written next to the audio files. Matched case-sensitively.
pub const COVER_FILENAME: &str = "folder.jpg";
