//! Command-line interface for music-organizer.
//!
//! This module provides CLI commands for organizing a music tree, cleaning
//! up what is left behind, and fetching album cover art.

mod commands;

pub use commands::{Cli, Commands, run_command};
