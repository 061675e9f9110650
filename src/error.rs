//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum, one variant per failure class
//! - [`FailureRecord`]: A non-fatal error tied to the file or directory it hit
//! - [`FailureLog`]: Shared accumulator for records produced by concurrent workers
//!
//! Per-unit errors never abort a run. Each phase collects them and hands
//! the list back to the caller at completion.

use parking_lot::Mutex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::enrichment::EnrichmentError;
use crate::metadata::TagError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The root of a phase does not exist or is not a directory
    #[error("Root directory unavailable: {0}")]
    RootUnavailable(PathBuf),

    /// Unreadable or corrupt tags
    #[error("Tag extraction failed: {0}")]
    TagExtraction(#[from] TagError),

    /// mkdir failed for a destination directory
    #[error("Could not create directory: {0}")]
    DirectoryCreation(#[source] std::io::Error),

    /// Collision, cross-device or permission failure while moving a file
    #[error("Could not move file to {destination}: {source}")]
    Move {
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be removed during cleanup
    #[error("Could not delete directory: {0}")]
    Deletion(#[source] std::io::Error),

    /// The metadata service answered but had nothing usable
    #[error("Cover lookup failed: {0}")]
    RemoteLookup(#[source] EnrichmentError),

    /// The metadata service could not be reached
    #[error("Network error: {0}")]
    Network(#[source] EnrichmentError),

    /// Image retrieval failed after the URL was resolved
    #[error("Cover download failed: {0}")]
    Download(#[source] EnrichmentError),

    /// Writing the cover into a file's tags failed
    #[error("Could not embed cover art: {0}")]
    Embed(#[source] TagError),

    /// A blocking worker panicked or was cancelled
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify a lookup failure as network-level or service-level.
    pub fn lookup(err: EnrichmentError) -> Self {
        match err {
            EnrichmentError::Network(_) | EnrichmentError::RateLimited => Self::Network(err),
            _ => Self::RemoteLookup(err),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RootUnavailable(_) => FailureKind::RootUnavailable,
            Self::TagExtraction(_) => FailureKind::TagExtraction,
            Self::DirectoryCreation(_) => FailureKind::DirectoryCreation,
            Self::Move { .. } => FailureKind::Move,
            Self::Deletion(_) => FailureKind::Deletion,
            Self::RemoteLookup(_) => FailureKind::RemoteLookup,
            Self::Network(_) => FailureKind::Network,
            Self::Download(_) => FailureKind::Download,
            Self::Embed(_) => FailureKind::Embed,
            Self::TaskJoin(_) | Self::Io(_) => FailureKind::Other,
        }
    }
}

/// Cause classification of a [`FailureRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    RootUnavailable,
    TagExtraction,
    DirectoryCreation,
    Move,
    Deletion,
    RemoteLookup,
    Network,
    Download,
    Embed,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RootUnavailable => "root",
            Self::TagExtraction => "tags",
            Self::DirectoryCreation => "mkdir",
            Self::Move => "move",
            Self::Deletion => "delete",
            Self::RemoteLookup => "lookup",
            Self::Network => "network",
            Self::Download => "download",
            Self::Embed => "embed",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A recorded, non-fatal per-unit error.
#[derive(Debug)]
pub struct FailureRecord {
    /// The file or directory the error belongs to
    pub subject: PathBuf,
    pub error: Error,
}

impl FailureRecord {
    pub fn new(subject: impl Into<PathBuf>, error: Error) -> Self {
        Self {
            subject: subject.into(),
            error,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.kind(),
            self.subject.display(),
            self.error
        )
    }
}

/// Cloneable failure accumulator shared between concurrent workers.
#[derive(Debug, Clone, Default)]
pub struct FailureLog(Arc<Mutex<Vec<FailureRecord>>>);

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, subject: &Path, error: Error) {
        tracing::warn!("{}: {}", subject.display(), error);
        self.0.lock().push(FailureRecord::new(subject, error));
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<FailureRecord> {
        std::mem::take(&mut *self.0.lock())
    }
}
