//! Cover art command.

use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::cover::{ArtFetcher, ArtOptions};
use crate::enrichment::{self, EnrichmentError, HttpDownloader};
use crate::error::FailureRecord;
use crate::metadata::{LoftyTags, TagStore};

use super::{ArtArgs, ProgressPrinter, ensure_root, print_failures};

/// Fetch cover art for every album directory under `root`
pub fn cmd_fetch_art(
    rt: &Runtime,
    config: &Config,
    root: &Path,
    args: &ArtArgs,
) -> anyhow::Result<()> {
    ensure_root(root)?;
    let failures = fetch_art(rt, config, root, args, Arc::new(LoftyTags))?;
    print_failures(&failures);
    Ok(())
}

/// Run the art pipeline until it finishes or Ctrl-C is pressed.
pub(super) fn fetch_art(
    rt: &Runtime,
    config: &Config,
    root: &Path,
    args: &ArtArgs,
    tags: Arc<dyn TagStore>,
) -> anyhow::Result<Vec<FailureRecord>> {
    let provider = args.provider.unwrap_or(config.artwork.provider);
    let api_key = config.lastfm_api_key(args.api_key.as_deref());

    let lookup = match enrichment::cover_lookup(provider, api_key) {
        Ok(lookup) => lookup,
        Err(EnrichmentError::MissingCredentials(what)) => {
            eprintln!("Get a Last.fm API key at: https://www.last.fm/api/account/create");
            eprintln!("Then use: --api-key YOUR_KEY, set LASTFM_API_KEY, or add it to the config file");
            eprintln!("Or use: --provider coverartarchive (no key needed)");
            anyhow::bail!("{} required", what);
        }
        Err(e) => return Err(e.into()),
    };

    let options = ArtOptions {
        concurrency: args.concurrency.unwrap_or(config.artwork.concurrency),
    };
    let fetcher = ArtFetcher::new(tags, lookup, Arc::new(HttpDownloader::new()?), options);

    println!("Fetching cover art ({:?}, {} at a time)", provider, options.concurrency);

    rt.block_on(async {
        let mut run = fetcher.run(root).await;
        let mut progress = ProgressPrinter::new("Fetching art");

        let interrupt = tokio::signal::ctrl_c();
        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                event = run.progress.next() => match event {
                    Some(event) => progress.update(event),
                    None => break,
                },
                _ = &mut interrupt => {
                    progress.interrupt();
                    eprintln!("Interrupted. Covers already written are kept.");
                    break;
                }
            }
        }

        Ok(run.failures.take())
    })
}
