//! Concurrent cover art fetching.
//!
//! # Flow
//! 1. Find eligible directories (blocking walk, once)
//! 2. For each directory, concurrently up to [`ArtOptions::concurrency`]:
//!    resolve the tag of the first audio file, look up a cover URL, download
//!    it to [`COVER_FILENAME`], embed it into every audio file
//! 3. Yield one [`ProgressEvent`] per finished directory
//!
//! Every directory is handled by exactly one worker, so no file is written
//! by two workers. Failures are collected in the run's [`FailureLog`] and
//! never stop other directories.

use futures::stream::{self, BoxStream, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::COVER_FILENAME;
use crate::enrichment::{CoverLookup, ImageDownloader};
use crate::error::{Error, FailureLog};
use crate::metadata::TagStore;
use crate::organizer::{Tag, TagResolver};
use crate::progress::ProgressEvent;
use crate::scanner;

/// Directories processed at once unless configured otherwise
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Tuning for an [`ArtFetcher`].
#[derive(Debug, Clone, Copy)]
pub struct ArtOptions {
    /// Maximum directories in flight
    pub concurrency: usize,
}

impl Default for ArtOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// A started art-fetch run.
///
/// `progress` is lazy: no directory is touched until it is polled. Dropping
/// it cancels outstanding work; covers already written stay.
pub struct ArtRun {
    pub progress: BoxStream<'static, ProgressEvent>,
    pub failures: FailureLog,
}

/// Finds and stores cover art for every album directory under a root.
#[derive(Clone)]
pub struct ArtFetcher {
    inner: Arc<Inner>,
}

struct Inner {
    tags: Arc<dyn TagStore>,
    resolver: TagResolver,
    lookup: Arc<dyn CoverLookup>,
    downloader: Arc<dyn ImageDownloader>,
    options: ArtOptions,
}

impl ArtFetcher {
    pub fn new(
        tags: Arc<dyn TagStore>,
        lookup: Arc<dyn CoverLookup>,
        downloader: Arc<dyn ImageDownloader>,
        options: ArtOptions,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                resolver: TagResolver::new(tags.clone()),
                tags,
                lookup,
                downloader,
                options,
            }),
        }
    }

    /// Compute the eligible directories under `root` and return the stream
    /// that processes them.
    pub async fn run(&self, root: impl AsRef<Path>) -> ArtRun {
        let root = root.as_ref().to_path_buf();
        let failures = FailureLog::new();

        if !root.is_dir() {
            failures.record(&root, Error::RootUnavailable(root.clone()));
            return ArtRun {
                progress: completed(),
                failures,
            };
        }

        let scan_root = root.clone();
        let dirs = match tokio::task::spawn_blocking(move || {
            scanner::art_eligible_directories(&scan_root)
        })
        .await
        {
            Ok(dirs) => dirs,
            Err(e) => {
                failures.record(&root, Error::TaskJoin(e.to_string()));
                Vec::new()
            }
        };

        let total = dirs.len();
        tracing::info!("{} directories under {:?} need cover art", total, root);
        if total == 0 {
            return ArtRun {
                progress: completed(),
                failures,
            };
        }

        let inner = self.inner.clone();
        let log = failures.clone();
        let concurrency = self.inner.options.concurrency.max(1);

        let progress = stream::iter(dirs)
            .map(move |dir| {
                let inner = inner.clone();
                let log = log.clone();
                async move { inner.fetch_directory(dir, &log).await }
            })
            .buffer_unordered(concurrency)
            .scan(0usize, move |done, ()| {
                *done += 1;
                futures::future::ready(Some(ProgressEvent::new(*done, total)))
            })
            .boxed();

        ArtRun { progress, failures }
    }
}

fn completed() -> BoxStream<'static, ProgressEvent> {
    stream::once(async { ProgressEvent::complete() }).boxed()
}

impl Inner {
    async fn fetch_directory(&self, dir: PathBuf, failures: &FailureLog) {
        let Some((files, tag)) = self.representative_tag(&dir, failures).await else {
            return;
        };

        let url = match self.lookup.cover_url(&tag.artist, &tag.album).await {
            Ok(url) => url,
            Err(e) => {
                failures.record(&dir, Error::lookup(e));
                return;
            }
        };

        let cover = dir.join(COVER_FILENAME);
        if let Err(e) = self.downloader.download(&url, &cover).await {
            failures.record(&dir, Error::Download(e));
            return;
        }
        tracing::info!("Saved cover for {} - {} to {:?}", tag.artist, tag.album, cover);

        let tags = self.tags.clone();
        let log = failures.clone();
        let embedded =
            tokio::task::spawn_blocking(move || embed_all(tags.as_ref(), &cover, &files, &log))
                .await;
        if let Err(e) = embedded {
            failures.record(&dir, Error::TaskJoin(e.to_string()));
        }
    }

    /// Audio files of `dir` and the tag of the first one. `None` when the
    /// directory should be skipped.
    async fn representative_tag(
        &self,
        dir: &Path,
        failures: &FailureLog,
    ) -> Option<(Vec<PathBuf>, Tag)> {
        let resolver = self.resolver.clone();
        let scan_dir = dir.to_path_buf();
        let joined = tokio::task::spawn_blocking(move || {
            let files = scanner::audio_files_in(&scan_dir);
            let tag = files.first().map(|first| (first.clone(), resolver.resolve(first)));
            (files, tag)
        })
        .await;

        let (files, tag) = match joined {
            Ok(result) => result,
            Err(e) => {
                failures.record(dir, Error::TaskJoin(e.to_string()));
                return None;
            }
        };

        match tag {
            None => {
                tracing::debug!("{:?} no longer holds audio, skipping", dir);
                None
            }
            Some((first, Err(e))) => {
                failures.record(&first, e);
                None
            }
            Some((_, Ok(tag))) => Some((files, tag)),
        }
    }
}

/// Embed the downloaded cover into each file. Per-file failures are recorded
/// and leave the sidecar in place.
fn embed_all(tags: &dyn TagStore, cover: &Path, files: &[PathBuf], failures: &FailureLog) {
    let data = match std::fs::read(cover) {
        Ok(data) => data,
        Err(e) => {
            failures.record(cover, Error::Io(e));
            return;
        }
    };

    for file in files {
        match tags.embed_cover(file, &data) {
            Ok(()) => tracing::debug!("Embedded cover into {:?}", file),
            Err(e) => failures.record(file, Error::Embed(e)),
        }
    }
}
