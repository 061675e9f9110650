//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `organize`: reorganize, clean, then optionally fetch art
//! - `clean`: remove directories without audio
//! - `art`: fetch cover art
//! - `settings`: show or initialize the config file

mod art;
mod clean;
mod organize;
mod settings;

use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::config::{self, CoverProvider};
use crate::error::FailureRecord;
use crate::progress::ProgressEvent;

pub use art::cmd_fetch_art;
pub use clean::cmd_clean;
pub use organize::cmd_organize;
pub use settings::cmd_config;

/// Music Organizer CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Cover art options shared by `organize` and `fetch-art`
#[derive(Args, Debug, Clone, Default)]
pub struct ArtArgs {
    /// Where to look up covers (default from config, else lastfm)
    #[arg(long, value_enum)]
    pub provider: Option<CoverProvider>,
    /// Last.fm API key (or set LASTFM_API_KEY env var)
    #[arg(long, env = "LASTFM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Album directories processed at once
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Move audio files into an Artist/Year - Album tree, then clean up
    Organize {
        /// Root of the music tree (organized in place)
        root: PathBuf,
        /// Directory pattern, e.g. "%A/%y - %a"
        #[arg(long)]
        dir_pattern: Option<String>,
        /// File name pattern without extension, e.g. "%tn - %t"
        #[arg(long)]
        file_pattern: Option<String>,
        /// Fetch cover art once files are in place
        #[arg(long)]
        fetch_art: bool,
        #[command(flatten)]
        art: ArtArgs,
    },
    /// Remove directories that hold no audio files
    Clean {
        /// Root of the music tree
        root: PathBuf,
    },
    /// Download cover art for album directories without folder.jpg
    FetchArt {
        /// Root of the music tree
        root: PathBuf,
        #[command(flatten)]
        art: ArtArgs,
    },
    /// Show the config file location and effective settings
    Config {
        /// Write the effective settings to the config file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = config::load();

    match &cli.command {
        Commands::Organize {
            root,
            dir_pattern,
            file_pattern,
            fetch_art,
            art,
        } => {
            let rt = Runtime::new()?;
            cmd_organize(
                &rt,
                &config,
                root,
                dir_pattern.as_deref(),
                file_pattern.as_deref(),
                *fetch_art,
                art,
            )
        }
        Commands::Clean { root } => cmd_clean(root),
        Commands::FetchArt { root, art } => {
            let rt = Runtime::new()?;
            cmd_fetch_art(&rt, &config, root, art)
        }
        Commands::Config { init } => cmd_config(&config, *init),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Fail early with a readable message when the root is unusable
pub(crate) fn ensure_root(root: &Path) -> anyhow::Result<()> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }
    Ok(())
}

/// Single-line percentage display
pub(crate) struct ProgressPrinter {
    label: &'static str,
    last: Option<u8>,
}

impl ProgressPrinter {
    pub(crate) fn new(label: &'static str) -> Self {
        Self { label, last: None }
    }

    pub(crate) fn update(&mut self, event: ProgressEvent) {
        if self.last == Some(event.percent) {
            return;
        }
        self.last = Some(event.percent);
        print!("\r{}: {:>3}%", self.label, event.percent);
        if event.is_complete() {
            println!();
        }
        let _ = std::io::stdout().flush();
    }

    /// End the line if the run stopped before 100%
    pub(crate) fn interrupt(&mut self) {
        if self.last.is_some_and(|p| p < 100) {
            println!();
        }
    }
}

/// List per-unit failures with their kind
pub(crate) fn print_failures(failures: &[FailureRecord]) {
    if failures.is_empty() {
        println!("No failures.");
        return;
    }
    eprintln!("\n{} failures:", failures.len());
    for failure in failures {
        eprintln!("  {}", failure);
    }
}
