//! Image downloads over HTTP.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::domain::EnrichmentError;
use super::traits::ImageDownloader;

/// [`ImageDownloader`] backed by `reqwest`.
///
/// The body is written next to the destination with a `.part` suffix and
/// renamed into place, so a failed or interrupted download never leaves a
/// truncated image behind.
pub struct HttpDownloader {
    http_client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl ImageDownloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), EnrichmentError> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::from_status(status));
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && !content_type.starts_with("image/")
        {
            return Err(EnrichmentError::Parse(format!(
                "expected an image, got {content_type}"
            )));
        }

        let data = response.bytes().await?;
        if data.is_empty() {
            return Err(EnrichmentError::NoImage);
        }

        tracing::debug!("Downloaded {} bytes from {}", data.len(), url);

        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || store(&data, &dest))
            .await
            .map_err(|e| EnrichmentError::Io(e.to_string()))?
    }
}

/// Write `data` to `dest` via a sibling `.part` file.
fn store(data: &[u8], dest: &Path) -> Result<(), EnrichmentError> {
    let temp_path = part_path(dest);
    let result = std::fs::write(&temp_path, data).and_then(|()| std::fs::rename(&temp_path, dest));
    if let Err(e) = result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(EnrichmentError::Io(format!("{}: {}", dest.display(), e)));
    }
    Ok(())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
