//! Music Organizer - tidies a music tree by its tags.
//!
//! Moves audio files into an `Artist/Year - Album/NN - Title` hierarchy,
//! removes directories left without audio, and optionally fetches album
//! cover art.

pub mod cli;
pub mod config;
pub mod cover;
pub mod enrichment;
pub mod error;
pub mod metadata;
pub mod organizer;
pub mod progress;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so progress lines on stdout stay intact)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("music_organizer=info".parse()?))
        .init();

    cli::run_command(&args)
}
