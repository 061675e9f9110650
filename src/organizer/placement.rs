//! Directory creation and file moves.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, FailureRecord, Result};

/// Result of a successful [`move_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives at this path
    Moved(PathBuf),
    /// The file was already where it belongs
    SameLocation,
}

/// Ensure `base/relative` exists and return its path.
///
/// Leading separators and `..` components in `relative` are dropped so the
/// result stays under `base`. A creation failure is pushed onto `failures`
/// and the would-be path is still returned; the caller's move then fails on
/// its own.
pub fn ensure_directory(
    base: &Path,
    relative: &Path,
    failures: &mut Vec<FailureRecord>,
) -> PathBuf {
    let path = base.join(confine(relative));
    if path.is_dir() {
        return path;
    }

    match fs::create_dir_all(&path) {
        Ok(()) => tracing::info!("Created directory {:?}", path),
        Err(e) => {
            tracing::warn!("Could not create directory {:?}: {}", path, e);
            failures.push(FailureRecord::new(&path, Error::DirectoryCreation(e)));
        }
    }
    path
}

/// Keep only the normal components of `relative`.
pub(crate) fn confine(relative: &Path) -> PathBuf {
    relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

/// Move `source` into `dst_dir` under `file_name`.
///
/// A destination that already is `source` counts as success. An existing
/// different file at the destination is never overwritten. On any failure
/// the source is left where it was.
pub fn move_file(
    source: &Path,
    dst_dir: &Path,
    file_name: impl AsRef<OsStr>,
) -> Result<MoveOutcome> {
    let destination = dst_dir.join(file_name.as_ref());

    if is_same_location(source, &destination) {
        tracing::debug!("{:?} already in place", source);
        return Ok(MoveOutcome::SameLocation);
    }

    let move_error = |source: io::Error| Error::Move {
        destination: destination.clone(),
        source,
    };

    if destination.exists() {
        return Err(move_error(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        )));
    }

    match fs::rename(source, &destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_then_remove(source, &destination).map_err(move_error)?;
        }
        Err(e) => return Err(move_error(e)),
    }

    tracing::info!("Moved {:?} -> {:?}", source, destination);
    Ok(MoveOutcome::Moved(destination))
}

fn is_same_location(source: &Path, destination: &Path) -> bool {
    if source == destination {
        return true;
    }
    // Catches case-only differences on case-insensitive filesystems
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Cross-device fallback. If the source cannot be removed after copying,
/// the copy is discarded so the file exists in exactly one place.
fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<()> {
    fs::copy(source, destination)?;
    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    Ok(())
}
