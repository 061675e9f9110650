//! The reorganize phase.
//!
//! [`Reorganizer`] is a lazy iterator: nothing touches the filesystem until
//! the first `next()`, and each further `next()` handles exactly one file
//! before reporting progress. Dropping it mid-way leaves every completed move
//! in place; running it again over the same tree is safe because files that
//! are already placed resolve as same-location no-ops.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::pattern::{self, Patterns};
use super::placement::{self, MoveOutcome};
use super::tag::{Tag, TagResolver};
use crate::error::{Error, FailureRecord};
use crate::progress::ProgressEvent;
use crate::scanner;

/// Totals for a finished (or abandoned) reorganize run.
#[derive(Debug, Default)]
pub struct ReorganizeReport {
    /// Files moved or renamed
    pub moved: usize,
    /// Audio files that were already in place
    pub unchanged: usize,
    /// Non-audio files left alone
    pub skipped: usize,
    pub failures: Vec<FailureRecord>,
}

/// Moves every audio file under a root into the place its tags dictate.
///
/// Yields one [`ProgressEvent`] per file in the tree (audio or not). The
/// file list is snapshotted once when iteration starts and doubles as the
/// progress denominator, so files moved during the run are never revisited.
pub struct Reorganizer {
    root: PathBuf,
    patterns: Patterns,
    resolver: TagResolver,
    queue: Option<std::vec::IntoIter<PathBuf>>,
    total: usize,
    done: usize,
    report: ReorganizeReport,
}

impl Reorganizer {
    pub fn new(root: impl AsRef<Path>, patterns: Patterns, resolver: TagResolver) -> Self {
        let root = root.as_ref();
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        Self {
            root,
            patterns,
            resolver,
            queue: None,
            total: 0,
            done: 0,
            report: ReorganizeReport::default(),
        }
    }

    /// Failures recorded so far.
    pub fn failures(&self) -> &[FailureRecord] {
        &self.report.failures
    }

    /// Stop iterating and hand back the totals.
    pub fn finish(self) -> ReorganizeReport {
        self.report
    }

    fn start(&mut self) -> std::vec::IntoIter<PathBuf> {
        if !self.root.is_dir() {
            tracing::warn!("Root {:?} is not a directory, nothing to organize", self.root);
            self.report.failures.push(FailureRecord::new(
                &self.root,
                Error::RootUnavailable(self.root.clone()),
            ));
            return Vec::new().into_iter();
        }

        let files = scanner::snapshot_files(&self.root);
        self.total = files.len();
        tracing::info!("Organizing {} files under {:?}", self.total, self.root);
        files.into_iter()
    }

    fn process(&mut self, path: &Path) {
        if !scanner::is_audio_file(path) {
            tracing::debug!("Skipping non-audio file {:?}", path);
            self.report.skipped += 1;
            return;
        }

        let tag = match self.resolver.resolve(path) {
            Ok(tag) => tag,
            Err(e) => {
                tracing::warn!("Leaving {:?} in place: {}", path, e);
                self.report.failures.push(FailureRecord::new(path, e));
                return;
            }
        };

        let Some(original_name) = path.file_name() else {
            return;
        };
        let file_name = if tag.is_complete() {
            renamed(&tag, &self.patterns.file, path).unwrap_or_else(|| original_name.to_owned())
        } else {
            original_name.to_owned()
        };

        // The file pattern may itself contain separators
        let relative = placement::confine(
            &Path::new(&pattern::generate(&tag, &self.patterns.directory)).join(&file_name),
        );
        let (Some(parent), Some(name)) = (relative.parent(), relative.file_name()) else {
            return;
        };

        let dst_dir = placement::ensure_directory(&self.root, parent, &mut self.report.failures);
        match placement::move_file(path, &dst_dir, name) {
            Ok(MoveOutcome::Moved(_)) => self.report.moved += 1,
            Ok(MoveOutcome::SameLocation) => self.report.unchanged += 1,
            Err(e) => {
                tracing::warn!("Could not move {:?}: {}", path, e);
                self.report.failures.push(FailureRecord::new(path, e));
            }
        }
    }
}

/// New file name from the file pattern, keeping the original extension.
/// `None` when the pattern expands to nothing.
fn renamed(tag: &Tag, file_pattern: &str, path: &Path) -> Option<OsString> {
    let stem = pattern::generate(tag, file_pattern);
    if stem.trim().is_empty() {
        return None;
    }
    let mut name = OsString::from(stem);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(name)
}

impl Iterator for Reorganizer {
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<ProgressEvent> {
        if self.queue.is_none() {
            let queue = self.start();
            self.queue = Some(queue);
            if self.total == 0 {
                return Some(ProgressEvent::complete());
            }
        }

        let path = self.queue.as_mut()?.next()?;
        self.process(&path);
        self.done += 1;
        Some(ProgressEvent::new(self.done, self.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::metadata::RawTag;
    use crate::test_utils::{FakeTags, full_raw_tag, write_file};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn reorganizer(root: &Path, tags: FakeTags) -> Reorganizer {
        Reorganizer::new(root, Patterns::default(), TagResolver::new(Arc::new(tags)))
    }

    fn metallica_tags() -> FakeTags {
        FakeTags::new().with_tag("metallica-01", full_raw_tag())
    }

    #[test]
    fn test_end_to_end_default_patterns() {
        let dir = tempdir().unwrap();
        let source = write_file(dir.path(), "incoming/trackA.mp3", "metallica-01");

        let mut run = reorganizer(dir.path(), metallica_tags());
        run.by_ref().for_each(drop);
        let report = run.finish();

        let expected = dir
            .path()
            .join("Metallica/1984 - Ride the Lightning/01 - Fight Fire with Fire.mp3");
        assert!(expected.is_file(), "missing {:?}", expected);
        assert!(!source.exists());
        assert_eq!(report.moved, 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_second_run_moves_nothing() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "trackA.mp3", "metallica-01");
        write_file(dir.path(), "misc/untagged.mp3", "partial");
        let tags = || {
            metallica_tags().with_tag(
                "partial",
                RawTag {
                    album: None,
                    ..full_raw_tag()
                },
            )
        };

        let mut first = reorganizer(dir.path(), tags());
        first.by_ref().for_each(drop);
        assert_eq!(first.finish().moved, 2);

        let mut second = reorganizer(dir.path(), tags());
        second.by_ref().for_each(drop);
        let report = second.finish();

        assert_eq!(report.moved, 0);
        assert_eq!(report.unchanged, 2);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_tag_failure_is_isolated() {
        let dir = tempdir().unwrap();
        let broken = write_file(dir.path(), "a_broken.mp3", "corrupt");
        write_file(dir.path(), "b_good.mp3", "metallica-01");
        let tags = metallica_tags().with_broken("corrupt");

        let mut run = reorganizer(dir.path(), tags);
        run.by_ref().for_each(drop);
        let report = run.finish();

        assert!(broken.exists(), "broken file must stay in place");
        assert!(
            dir.path()
                .join("Metallica/1984 - Ride the Lightning/01 - Fight Fire with Fire.mp3")
                .exists()
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].subject, broken);
        assert_eq!(report.failures[0].kind(), FailureKind::TagExtraction);
    }

    #[test]
    fn test_defaulted_tag_keeps_original_name() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "orig name.mp3", "no-album");
        let tags = FakeTags::new().with_tag(
            "no-album",
            RawTag {
                album: None,
                ..full_raw_tag()
            },
        );

        let mut run = reorganizer(dir.path(), tags);
        run.by_ref().for_each(drop);

        assert!(
            dir.path()
                .join("Metallica/1984 - Untitled Album/orig name.mp3")
                .is_file()
        );
    }

    #[test]
    fn test_progress_is_monotonic_and_counts_every_file() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a.mp3", "metallica-01");
        write_file(dir.path(), "b.txt", "notes");
        write_file(dir.path(), "c.mp3", "corrupt");
        let tags = metallica_tags().with_broken("corrupt");

        let percents: Vec<u8> = reorganizer(dir.path(), tags).map(|e| e.percent).collect();

        assert_eq!(percents, vec![33, 66, 100]);
    }

    #[test]
    fn test_empty_root_yields_single_hundred() {
        let dir = tempdir().unwrap();
        let events: Vec<ProgressEvent> = reorganizer(dir.path(), FakeTags::new()).collect();
        assert_eq!(events, vec![ProgressEvent::complete()]);
    }

    #[test]
    fn test_missing_root_completes_and_records() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let mut run = reorganizer(&missing, FakeTags::new());
        let events: Vec<ProgressEvent> = run.by_ref().collect();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].percent, 100);
        assert_eq!(run.failures().len(), 1);
        assert_eq!(run.failures()[0].kind(), FailureKind::RootUnavailable);
    }

    #[test]
    fn test_collision_leaves_second_file_in_place() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a/one.mp3", "metallica-01");
        let twin = write_file(dir.path(), "b/two.mp3", "metallica-01 copy");
        let tags = metallica_tags().with_tag("metallica-01 copy", full_raw_tag());

        let mut run = reorganizer(dir.path(), tags);
        run.by_ref().for_each(drop);
        let report = run.finish();

        assert_eq!(report.moved, 1);
        assert!(twin.exists());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind(), FailureKind::Move);
    }

    #[test]
    fn test_custom_file_pattern_may_nest() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "x.wav", "metallica-01");
        let patterns = Patterns {
            directory: "%A".to_string(),
            file: "%a/%tn %t".to_string(),
        };

        let run = Reorganizer::new(
            dir.path(),
            patterns,
            TagResolver::new(Arc::new(metallica_tags())),
        );
        run.for_each(drop);

        assert!(
            dir.path()
                .join("Metallica/Ride the Lightning/01 Fight Fire with Fire.wav")
                .is_file()
        );
    }

    #[test]
    fn test_nothing_happens_before_first_next() {
        let dir = tempdir().unwrap();
        let source = write_file(dir.path(), "trackA.mp3", "metallica-01");

        let run = reorganizer(dir.path(), metallica_tags());
        drop(run);

        assert!(source.exists());
    }
}
