//! Last.fm API Data Transfer Objects
//!
//! These types match what `album.getInfo` returns with `format=json`.
//! Last.fm reports most errors with HTTP 200 and an `error` body, so the
//! top-level response is untagged.
//!
//! API Reference: https://www.last.fm/api/show/album.getInfo

use serde::{Deserialize, Serialize};

/// Either an album or an error body
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AlbumInfoResponse {
    Album { album: AlbumInfo },
    Error(ApiError),
}

/// Album details (only the fields we read)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumInfo {
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub mbid: Option<String>,
    /// One entry per advertised size
    #[serde(default)]
    pub image: Vec<Image>,
}

/// A single sized image
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    /// small, medium, large, extralarge, mega, or empty
    #[serde(default)]
    pub size: String,
    /// Image URL; empty when Last.fm has no art
    #[serde(rename = "#text")]
    pub url: String,
}

/// Error body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: u32,
    pub message: String,
}

/// Error code for "album not found"
pub const ERROR_NOT_FOUND: u32 = 6;
/// Error codes for transient service trouble
pub const ERROR_OPERATION_FAILED: u32 = 8;
pub const ERROR_SERVICE_OFFLINE: u32 = 11;
pub const ERROR_TEMPORARY: u32 = 16;
/// Error code for rate limiting
pub const ERROR_RATE_LIMIT: u32 = 29;

fn size_rank(size: &str) -> u8 {
    match size {
        "small" => 1,
        "medium" => 2,
        "large" => 3,
        "extralarge" => 4,
        "mega" => 5,
        _ => 0,
    }
}

/// Size segment of the largest variant the CDN lists
const LISTED_SIZE: &str = "/300x300/";
/// The CDN serves the same image at this size on request
const UPSCALED_SIZE: &str = "/600x600/";

impl AlbumInfo {
    /// URL of the highest-resolution image on offer.
    ///
    /// `extralarge` and `mega` both point at 300x300 renditions; the size
    /// segment is rewritten to fetch the 600x600 one.
    pub fn largest_image(&self) -> Option<String> {
        self.image
            .iter()
            .filter(|img| !img.url.is_empty())
            .max_by_key(|img| size_rank(&img.size))
            .map(|img| img.url.replacen(LISTED_SIZE, UPSCALED_SIZE, 1))
    }
}
