//! Cover Art Archive integration
//!
//! Resolves album artwork through MusicBrainz release IDs. No API key
//! required.

pub mod dto;
mod client;

pub use client::MusicBrainzCovers;
