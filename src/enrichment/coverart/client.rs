//! Cover Art Archive lookup
//!
//! A MusicBrainz release search finds the release ID, then the release's
//! cover listing on coverartarchive.org supplies the front image URL.
//!
//! API: https://coverartarchive.org

use async_trait::async_trait;

use super::dto;
use crate::enrichment::domain::EnrichmentError;
use crate::enrichment::musicbrainz::MusicBrainzClient;
use crate::enrichment::traits::CoverLookup;

/// [`CoverLookup`] backed by MusicBrainz and the Cover Art Archive
pub struct MusicBrainzCovers {
    musicbrainz: MusicBrainzClient,
    http_client: reqwest::Client,
    base_url: String,
}

impl MusicBrainzCovers {
    /// Create a lookup against the public services
    pub fn new() -> Result<Self, EnrichmentError> {
        Self::with_clients(MusicBrainzClient::new()?, "https://coverartarchive.org")
    }

    /// Use a specific MusicBrainz client and Cover Art Archive base URL
    pub fn with_clients(
        musicbrainz: MusicBrainzClient,
        base_url: impl Into<String>,
    ) -> Result<Self, EnrichmentError> {
        Ok(Self {
            musicbrainz,
            http_client: reqwest::Client::builder().gzip(true).build()?,
            base_url: base_url.into(),
        })
    }

    /// List all cover art for a release
    pub async fn list_cover_art(
        &self,
        release_id: &str,
    ) -> Result<dto::CoverArtResponse, EnrichmentError> {
        let url = format!("{}/release/{}", self.base_url, release_id);

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // The archive answers 404 for releases without any artwork
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NoImage);
        }

        if !status.is_success() {
            return Err(EnrichmentError::from_status(status));
        }

        response
            .json::<dto::CoverArtResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}

/// Full-size front image, never a thumbnail
fn front_image_url(listing: &dto::CoverArtResponse) -> Option<String> {
    listing.front().map(|image| image.image.clone())
}

#[async_trait]
impl CoverLookup for MusicBrainzCovers {
    async fn cover_url(&self, artist: &str, album: &str) -> Result<String, EnrichmentError> {
        let release_id = self.musicbrainz.find_release(artist, album).await?;
        let listing = self.list_cover_art(&release_id).await?;
        front_image_url(&listing).ok_or(EnrichmentError::NoImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let covers = MusicBrainzCovers::new().unwrap();
        assert_eq!(covers.base_url, "https://coverartarchive.org");
    }

    #[test]
    fn test_front_image_url_is_the_original() {
        let listing: dto::CoverArtResponse = serde_json::from_str(
            r#"{
                "release": "https://musicbrainz.org/release/abc",
                "images": [{
                    "front": true,
                    "image": "http://coverartarchive.org/release/abc/123.jpg",
                    "thumbnails": {
                        "250": "http://coverartarchive.org/release/abc/123-250.jpg",
                        "500": "http://coverartarchive.org/release/abc/123-500.jpg",
                        "1200": "http://coverartarchive.org/release/abc/123-1200.jpg"
                    },
                    "approved": true
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(
            front_image_url(&listing).as_deref(),
            Some("http://coverartarchive.org/release/abc/123.jpg")
        );
    }

    #[test]
    fn test_listing_without_front_has_no_url() {
        let listing: dto::CoverArtResponse = serde_json::from_str(
            r#"{"release": "https://musicbrainz.org/release/abc", "images": []}"#,
        )
        .unwrap();
        assert_eq!(front_image_url(&listing), None);
    }

    #[tokio::test]
    async fn test_unreachable_archive_is_network_error() {
        let covers = MusicBrainzCovers::with_clients(
            MusicBrainzClient::new().unwrap(),
            "http://127.0.0.1:9",
        )
        .unwrap();
        let result = covers.list_cover_art("abc").await;
        assert!(matches!(result, Err(EnrichmentError::Network(_))));
    }
}
