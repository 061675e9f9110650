//! Post-reorganize cleanup of directories without audio.
//!
//! The walk is post-order: a directory is judged only after all of its
//! children have been judged (and, if empty of audio, deleted). A parent
//! whose last audio-bearing descendant moved away is therefore caught in the
//! same pass. A top-down walk would miss it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, FailureRecord};
use crate::scanner;

/// What a cleanup pass did.
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Directories removed, deepest first
    pub removed: Vec<PathBuf>,
    pub failures: Vec<FailureRecord>,
}

/// Delete every directory under `root` with no audio file anywhere below it.
///
/// `root` itself is kept. Directories that cannot be listed are treated as
/// holding audio so they are never deleted unseen.
pub fn clean(root: &Path) -> CleanReport {
    let mut report = CleanReport::default();

    if !root.is_dir() {
        tracing::warn!("Root {:?} is not a directory, nothing to clean", root);
        report.failures.push(FailureRecord::new(
            root,
            Error::RootUnavailable(root.to_path_buf()),
        ));
        return report;
    }

    tracing::info!("Cleaning {:?}", root);
    prune(root, &mut report);
    tracing::info!(
        "Removed {} directories ({} failures)",
        report.removed.len(),
        report.failures.len()
    );
    report
}

/// Returns whether `dir` still contains audio after its children were pruned.
fn prune(dir: &Path, report: &mut CleanReport) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not list {:?}: {}", dir, e);
            report.failures.push(FailureRecord::new(dir, Error::Io(e)));
            return true;
        }
    };

    let mut has_audio = false;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        // DirEntry::file_type does not follow symlinks
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if prune(&path, report) {
                has_audio = true;
            } else if let Err(e) = fs::remove_dir_all(&path) {
                tracing::warn!("Could not delete {:?}: {}", path, e);
                report.failures.push(FailureRecord::new(&path, Error::Deletion(e)));
            } else {
                tracing::info!("Deleted directory {:?}", path);
                report.removed.push(path);
            }
        } else if scanner::is_audio_file(&path) {
            has_audio = true;
        }
    }
    has_audio
}
