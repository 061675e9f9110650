//! MusicBrainz HTTP client
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to
//! 1 req/sec per client. Requests from one client are spaced at least
//! [`MIN_REQUEST_INTERVAL`] apart, even when callers run concurrently.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::dto;
use crate::enrichment::domain::EnrichmentError;

/// User agent string - MusicBrainz requires this
const USER_AGENT: &str = concat!(
    "MusicOrganizer/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/music-organizer)"
);

/// Gap enforced between two requests
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1100);

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
    /// When the previous request was sent
    last_request: Mutex<Option<Instant>>,
}

impl MusicBrainzClient {
    /// Create a new client
    pub fn new() -> Result<Self, EnrichmentError> {
        Self::with_base_url("https://musicbrainz.org/ws/2")
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            last_request: Mutex::new(None),
        })
    }

    /// Find the best-scoring release for an artist / album pair and
    /// return its MusicBrainz ID.
    pub async fn find_release(&self, artist: &str, album: &str) -> Result<String, EnrichmentError> {
        let response = self.send_search_request(artist, album).await?;
        response
            .releases
            .into_iter()
            .next()
            .map(|release| {
                tracing::debug!(
                    "Matched {} / {} to release {} ({:?})",
                    artist,
                    album,
                    release.id,
                    release.title
                );
                release.id
            })
            .ok_or(EnrichmentError::NoMatches)
    }

    async fn send_search_request(
        &self,
        artist: &str,
        album: &str,
    ) -> Result<dto::ReleaseSearchResponse, EnrichmentError> {
        let query = search_query(artist, album);
        let url = format!(
            "{}/release/?query={}&fmt=json&limit=1",
            self.base_url,
            urlencoding::encode(&query)
        );

        self.throttle().await;
        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        // MusicBrainz answers 503 when the rate limit is exceeded
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(EnrichmentError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            return Err(EnrichmentError::from_status(status));
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(EnrichmentError::ApiError(error.error));
            }
            return Err(EnrichmentError::from_status(status));
        }

        response
            .json::<dto::ReleaseSearchResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }

    /// Sleep until the rate limit allows another request.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let wait = remaining_wait(previous.elapsed());
            if !wait.is_zero() {
                tracing::trace!("Throttling MusicBrainz for {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

fn remaining_wait(elapsed: Duration) -> Duration {
    MIN_REQUEST_INTERVAL.saturating_sub(elapsed)
}

/// Lucene query matching both the release title and the artist.
fn search_query(artist: &str, album: &str) -> String {
    format!(
        "release:\"{}\" AND artist:\"{}\"",
        escape_phrase(album),
        escape_phrase(artist)
    )
}

fn escape_phrase(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MusicBrainzClient::new().unwrap();
        assert_eq!(client.base_url, "https://musicbrainz.org/ws/2");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = MusicBrainzClient::with_base_url("http://localhost:8080").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("MusicOrganizer/"));
    }

    #[test]
    fn test_search_query_escapes_quotes() {
        assert_eq!(
            search_query("Metallica", "Ride the Lightning"),
            r#"release:"Ride the Lightning" AND artist:"Metallica""#
        );
        assert_eq!(
            search_query("A \"B\"", r"C\D"),
            r#"release:"C\\D" AND artist:"A \"B\"""#
        );
    }

    #[test]
    fn test_remaining_wait() {
        assert_eq!(remaining_wait(Duration::ZERO), MIN_REQUEST_INTERVAL);
        assert_eq!(
            remaining_wait(Duration::from_millis(600)),
            Duration::from_millis(500)
        );
        assert_eq!(remaining_wait(Duration::from_secs(5)), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = MusicBrainzClient::with_base_url("http://127.0.0.1:9").unwrap();
        let result = client.find_release("Metallica", "Ride the Lightning").await;
        assert!(matches!(result, Err(EnrichmentError::Network(_))));
    }
}
