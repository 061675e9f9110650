//! Cleanup command.

use std::path::Path;

use crate::organizer;

use super::{ensure_root, print_failures};

/// Remove directories without audio under `root`
pub fn cmd_clean(root: &Path) -> anyhow::Result<()> {
    ensure_root(root)?;

    println!("Cleaning {:?}", root);
    let report = organizer::clean(root);

    for dir in &report.removed {
        println!("REMOVED: {}", dir.display());
    }
    println!("\nRemoved {} directories", report.removed.len());
    print_failures(&report.failures);
    Ok(())
}
