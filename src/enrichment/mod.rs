//! Remote collaborators for cover art.
//!
//! # Architecture
//!
//! - **Domain errors** (`domain.rs`) - [`EnrichmentError`], shared by every client
//! - **Traits** (`traits.rs`) - [`CoverLookup`] and [`ImageDownloader`], the
//!   seams the art pipeline is written against
//! - **API DTOs** (`lastfm/dto.rs`, `musicbrainz/dto.rs`, `coverart/dto.rs`) -
//!   exact API response shapes, never used outside their module
//! - **Clients** - HTTP clients implementing the traits
//!
//! # Usage
//!
//! ```ignore
//! let lookup = enrichment::cover_lookup(CoverProvider::LastFm, Some(api_key))?;
//! let url = lookup.cover_url("Metallica", "Ride the Lightning").await?;
//! HttpDownloader::new()?.download(&url, Path::new("folder.jpg")).await?;
//! ```

pub mod coverart;
pub mod domain;
pub mod download;
pub mod lastfm;
pub mod musicbrainz;
pub mod traits;

use std::sync::Arc;

pub use coverart::MusicBrainzCovers;
pub use domain::EnrichmentError;
pub use download::HttpDownloader;
pub use lastfm::LastFmClient;
pub use musicbrainz::MusicBrainzClient;
pub use traits::{CoverLookup, ImageDownloader};

use crate::config::CoverProvider;

/// Build the lookup for `provider`. Last.fm needs an API key.
pub fn cover_lookup(
    provider: CoverProvider,
    api_key: Option<&str>,
) -> Result<Arc<dyn CoverLookup>, EnrichmentError> {
    let lookup: Arc<dyn CoverLookup> = match provider {
        CoverProvider::LastFm => {
            let key = api_key.ok_or_else(|| {
                EnrichmentError::MissingCredentials("Last.fm API key".to_string())
            })?;
            Arc::new(LastFmClient::new(key)?)
        }
        CoverProvider::CoverArtArchive => Arc::new(MusicBrainzCovers::new()?),
    };
    Ok(lookup)
}
