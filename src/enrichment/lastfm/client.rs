//! Last.fm HTTP client

use async_trait::async_trait;

use super::dto::{self, AlbumInfoResponse};
use crate::enrichment::domain::EnrichmentError;
use crate::enrichment::traits::CoverLookup;

/// Last.fm API client
pub struct LastFmClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl LastFmClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, EnrichmentError> {
        Self::with_base_url(api_key, "https://ws.audioscrobbler.com/2.0/")
    }

    /// Create a client against a custom endpoint
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, EnrichmentError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EnrichmentError::MissingCredentials(
                "Last.fm API key".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            api_key,
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Look up an album and return the URL of its largest cover image
    pub async fn album_cover(&self, artist: &str, album: &str) -> Result<String, EnrichmentError> {
        let url = format!(
            "{}?method=album.getinfo&api_key={}&artist={}&album={}&autocorrect=1&format=json",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(artist),
            urlencoding::encode(album),
        );

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        // Error bodies come with 200 as well as 4xx, so try to parse either way
        let body = response.text().await?;
        match serde_json::from_str::<AlbumInfoResponse>(&body) {
            Ok(AlbumInfoResponse::Album { album }) => album
                .largest_image()
                .ok_or(EnrichmentError::NoImage),
            Ok(AlbumInfoResponse::Error(error)) => Err(classify(error)),
            Err(_) if !status.is_success() => Err(EnrichmentError::from_status(status)),
            Err(e) => Err(EnrichmentError::Parse(e.to_string())),
        }
    }
}

#[async_trait]
impl CoverLookup for LastFmClient {
    async fn cover_url(&self, artist: &str, album: &str) -> Result<String, EnrichmentError> {
        self.album_cover(artist, album).await
    }
}

fn classify(error: dto::ApiError) -> EnrichmentError {
    match error.error {
        dto::ERROR_NOT_FOUND => EnrichmentError::NoMatches,
        dto::ERROR_RATE_LIMIT => EnrichmentError::RateLimited,
        dto::ERROR_OPERATION_FAILED | dto::ERROR_SERVICE_OFFLINE | dto::ERROR_TEMPORARY => {
            EnrichmentError::Network(error.message)
        }
        _ => EnrichmentError::ApiError(error.message),
    }
}
