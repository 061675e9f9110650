//! Trait definitions for the remote collaborators.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute the fakes in `test_utils`.

use async_trait::async_trait;
use std::path::Path;

use super::domain::EnrichmentError;

/// Finds a cover image URL for an album.
#[async_trait]
pub trait CoverLookup: Send + Sync {
    /// Resolve the best available cover image for `artist` / `album`.
    async fn cover_url(&self, artist: &str, album: &str) -> Result<String, EnrichmentError>;
}

/// Fetches an image to a local file.
#[async_trait]
pub trait ImageDownloader: Send + Sync {
    /// Download `url` to `dest`. On failure `dest` is left untouched.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), EnrichmentError>;
}
