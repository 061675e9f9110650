//! File organization command.

use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::metadata::{LoftyTags, TagStore};
use crate::organizer::{self, Patterns, Reorganizer, TagResolver};

use super::{ArtArgs, ProgressPrinter, art, ensure_root, print_failures};

/// Reorganize `root` in place, remove emptied directories, then fetch
/// cover art when asked to (flag or config).
pub fn cmd_organize(
    rt: &Runtime,
    config: &Config,
    root: &Path,
    dir_pattern: Option<&str>,
    file_pattern: Option<&str>,
    fetch_art: bool,
    art_args: &ArtArgs,
) -> anyhow::Result<()> {
    ensure_root(root)?;

    let patterns = Patterns {
        directory: dir_pattern.unwrap_or(config.patterns.directory.as_str()).to_string(),
        file: file_pattern.unwrap_or(config.patterns.file.as_str()).to_string(),
    };
    println!("Organizing {:?}", root);
    println!("Directory pattern: {}", patterns.directory);
    println!("File pattern:      {}", patterns.file);

    let tags: Arc<dyn TagStore> = Arc::new(LoftyTags);
    let mut run = Reorganizer::new(root, patterns, TagResolver::new(tags.clone()));
    let mut progress = ProgressPrinter::new("Organizing");
    for event in run.by_ref() {
        progress.update(event);
    }
    let report = run.finish();
    println!(
        "Moved {}, already in place {}, non-audio left alone {}",
        report.moved, report.unchanged, report.skipped
    );

    let cleaned = organizer::clean(root);
    println!("Removed {} directories without audio", cleaned.removed.len());

    let mut failures = report.failures;
    failures.extend(cleaned.failures);

    if fetch_art || config.artwork.enabled {
        failures.extend(art::fetch_art(rt, config, root, art_args, tags)?);
    }

    print_failures(&failures);
    Ok(())
}
