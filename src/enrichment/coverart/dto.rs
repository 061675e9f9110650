//! Cover Art Archive API Data Transfer Objects
//!
//! The Cover Art Archive (https://coverartarchive.org) provides album artwork
//! for MusicBrainz releases. It's a free service with no API key required.
//!
//! API Reference: https://wiki.musicbrainz.org/Cover_Art_Archive/API

use serde::{Deserialize, Serialize};

/// Cover art listing for a release
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoverArtResponse {
    #[serde(default)]
    pub images: Vec<Image>,
    /// URL of the release on MusicBrainz
    pub release: String,
}

/// A single cover art image
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    pub front: bool,
    #[serde(default)]
    pub back: bool,
    /// Image types (Front, Back, Booklet, etc.)
    #[serde(default)]
    pub types: Vec<String>,
    /// URL to full-size image
    pub image: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub approved: bool,
}

/// Available thumbnail sizes
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Thumbnails {
    /// 250px thumbnail
    #[serde(rename = "250")]
    pub small: Option<String>,
    /// 500px thumbnail
    #[serde(rename = "500")]
    pub large: Option<String>,
    /// 1200px thumbnail (if available)
    #[serde(rename = "1200")]
    pub xlarge: Option<String>,
}

impl CoverArtResponse {
    /// The image flagged as the front cover, approved ones first.
    pub fn front(&self) -> Option<&Image> {
        let mut fronts = self.images.iter().filter(|img| img.front);
        let first = fronts.clone().next();
        fronts.find(|img| img.approved).or(first)
    }
}
