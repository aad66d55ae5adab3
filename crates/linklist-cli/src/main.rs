// SPDX-License-Identifier: MPL-2.0-or-later
//! Linklist CLI entry point
//!
//! Resolves a link list document from a JSON content snapshot and prints the
//! nested link tree as JSON on stdout. Logging goes to stderr and is
//! controlled through `RUST_LOG`.

mod config;
mod href;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use config::CliConfig;
use href::PatternHrefResolver;
use linklist_core::{LinkListResolver, LinkNode};
use linklist_store::MemoryStore;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "linklist", version, about = "Resolve link list documents into navigation trees")]
struct Cli {
    /// JSON snapshot with `documents` and `bookmarks`
    #[arg(long, env = "LINKLIST_SNAPSHOT")]
    snapshot: PathBuf,

    /// TOML configuration file
    #[arg(long, env = "LINKLIST_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    target: Target,

    /// Override the link list document type
    #[arg(long)]
    document_type: Option<String>,

    /// Override the field holding the group of links
    #[arg(long)]
    fragment_name: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Resolve the document behind a bookmark
    #[arg(long)]
    bookmark: Option<String>,

    /// Resolve a document by id
    #[arg(long)]
    id: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}

fn run(cli: &Cli) -> Result<String> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(doc_type) = &cli.document_type {
        config.resolver.document_type = doc_type.clone();
    }
    if let Some(name) = &cli.fragment_name {
        config.resolver.fragment_name = name.clone();
    }

    let store = MemoryStore::load(&cli.snapshot)
        .with_context(|| format!("failed to load snapshot {}", cli.snapshot.display()))?;
    info!(documents = store.len(), "snapshot ready");

    let href = PatternHrefResolver::new(config.href.document_pattern.clone());
    let resolver = LinkListResolver::with_config(store, href, config.resolver);
    let links = resolve(&resolver, &cli.target)?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&links)?
    } else {
        serde_json::to_string(&links)?
    };
    Ok(output)
}

fn resolve(
    resolver: &LinkListResolver<MemoryStore, PatternHrefResolver>,
    target: &Target,
) -> Result<Vec<LinkNode>> {
    let links = match (&target.bookmark, &target.id) {
        (Some(bookmark), _) => resolver
            .resolve_by_bookmark(bookmark)
            .with_context(|| format!("failed to resolve bookmark {bookmark}"))?,
        (None, Some(id)) => resolver
            .resolve_by_id(id)
            .with_context(|| format!("failed to resolve document {id}"))?,
        (None, None) => anyhow::bail!("either --bookmark or --id is required"),
    };
    Ok(links)
}
