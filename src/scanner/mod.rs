//! Directory tree traversal.
//!
//! Everything here is synchronous `walkdir` traversal. Callers in async
//! context run it on a blocking thread.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cover::COVER_FILENAME;

/// Audio extensions, matched exactly (case-sensitive).
///
/// mp4/wmv/mpg may also carry video; the list is kept as-is so existing
/// libraries organize the same way they always have.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "mp4", "wmv", "mpg", "mpeg", "m3u", "mid", "wma", "midi", "wav", "m4a",
];

/// Whether `path` carries one of the allow-listed audio extensions.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext))
}

/// Snapshot of every file (audio or not) under `root`, sorted by path.
///
/// Unreadable entries are skipped. Symlinks are not followed.
pub fn snapshot_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

/// Audio files directly inside `dir`, sorted by name.
pub fn audio_files_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .map(|e| e.path())
        .filter(|p| is_audio_file(p))
        .collect();
    files.sort();
    files
}

/// Whether `dir` holds an entry named exactly [`COVER_FILENAME`].
///
/// Compares directory entry names rather than probing the path, so
/// `Folder.JPG` on a case-insensitive filesystem does not count.
pub fn has_cover(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.file_name() == COVER_FILENAME)
        })
        .unwrap_or(false)
}

/// Directories under `root` (root included) that directly contain audio
/// and lack the canonical cover file. Sorted by path.
pub fn art_eligible_directories(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .filter(|dir| !audio_files_in(dir).is_empty() && !has_cover(dir))
        .collect()
}
