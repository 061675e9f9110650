//! Last.fm integration
//!
//! Looks up album artwork through `album.getInfo`. Requires an API key
//! (https://www.last.fm/api/account/create).

pub mod dto;
mod client;

pub use client::LastFmClient;
