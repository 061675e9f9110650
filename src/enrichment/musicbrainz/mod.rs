//! MusicBrainz API integration
//!
//! Finds the release that matches an artist / album pair. The release ID
//! is what the Cover Art Archive is keyed on.
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API

pub mod dto;
mod client;

pub use client::MusicBrainzClient;
