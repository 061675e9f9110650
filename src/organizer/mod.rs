//! File organization.
//!
//! Moves audio files into a directory hierarchy derived from their tags,
//! e.g. `Metallica/1984 - Ride the Lightning/01 - Fight Fire with Fire.mp3`,
//! then removes directories that no longer hold any audio.
//!
//! # Pipeline
//! 1. [`TagResolver`] reads and defaults the tag of each file
//! 2. [`generate`] expands the directory and file patterns
//! 3. [`ensure_directory`] creates the destination
//! 4. [`move_file`] moves (and possibly renames) the file
//!
//! [`Reorganizer`] drives steps 1–4 over a whole tree; [`clean`] runs after it.

pub mod cleaner;
pub mod pattern;
pub mod placement;
pub mod reorganize;
pub mod tag;

pub use cleaner::{CleanReport, clean};
pub use pattern::{DEFAULT_DIR_PATTERN, DEFAULT_FILE_PATTERN, Patterns, generate, sanitize};
pub use placement::{MoveOutcome, ensure_directory, move_file};
pub use reorganize::{ReorganizeReport, Reorganizer};
pub use tag::{Tag, TagResolver};
