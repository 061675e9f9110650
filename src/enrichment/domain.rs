//! Errors shared by the remote collaborators.
//!
//! Every client converts its own HTTP and parse failures into
//! [`EnrichmentError`], so the art-fetch pipeline never sees a `reqwest`
//! type.

/// Errors that can occur while looking up or downloading cover art
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No matching album found")]
    NoMatches,

    #[error("Album has no cover image")]
    NoImage,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Failed to store image: {0}")]
    Io(String),
}

impl EnrichmentError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status {
            reqwest::StatusCode::NOT_FOUND => Self::NoMatches,
            reqwest::StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            _ => Self::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )),
        }
    }
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            EnrichmentError::from_status(reqwest::StatusCode::NOT_FOUND),
            EnrichmentError::NoMatches
        ));
        assert!(matches!(
            EnrichmentError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            EnrichmentError::RateLimited
        ));
        let err = EnrichmentError::from_status(reqwest::StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("502"));
    }
}
