//! Command-line host for the price-intel library.
//!
//! Prints JSON to stdout, logs to stderr.

mod config;
mod page;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use price_intel::{
    normalize, trending, AdapterRegistry, HtmlDocument, HttpBackend, MemoryStore, PageEvent,
    PageObserver, PollOutcome, QuoteSynthesizer, Session, WatchlistService,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::page::FilePage;

#[derive(Parser)]
#[command(name = "price-intel")]
#[command(about = "Product-page extraction and price comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare prices for a query
    Search {
        query: Vec<String>,
        /// Seed for reproducible results
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the simulated network latency
        #[arg(long)]
        no_delay: bool,
    },

    /// Clean up a spoken or typed query
    Normalize { text: Vec<String> },

    /// Extract the product from a saved page
    Extract {
        #[arg(long)]
        url: String,
        #[arg(long)]
        file: PathBuf,
    },

    /// Observe a saved page and print every product event
    Watch {
        #[arg(long)]
        url: String,
        #[arg(long)]
        file: PathBuf,
        /// Re-read the page this many times after detection
        #[arg(long, default_value_t = 0)]
        changes: u32,
    },

    /// List trending searches
    Trending,

    /// Check a bearer token against the backend
    Whoami {
        #[arg(long, env = "PRICE_INTEL_TOKEN")]
        token: String,
    },
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,price_intel=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Search {
            query,
            seed,
            no_delay,
        } => cmd_search(&config, &query.join(" "), seed, no_delay).await,
        Commands::Normalize { text } => output(&normalize(&text.join(" "))),
        Commands::Extract { url, file } => cmd_extract(&url, &file),
        Commands::Watch { url, file, changes } => cmd_watch(&config, url, file, changes).await,
        Commands::Trending => output(&trending()),
        Commands::Whoami { token } => cmd_whoami(&config, token).await,
    }
}

async fn cmd_search(config: &Config, query: &str, seed: Option<u64>, no_delay: bool) -> Result<()> {
    let mut synth_config = config.synthesizer();
    if let Some(seed) = seed {
        synth_config = synth_config.with_seed(seed);
    }
    if no_delay {
        synth_config = synth_config.with_latency_ms(0);
    }

    let result = QuoteSynthesizer::new(synth_config).search(query).await?;
    output(&result)
}

fn cmd_extract(url: &str, file: &Path) -> Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let doc = HtmlDocument::parse(url, &html);
    let record = AdapterRegistry::default().extract(&doc)?;
    output(&record)
}

async fn cmd_watch(config: &Config, url: String, file: PathBuf, changes: u32) -> Result<()> {
    let observer_config = config.observer();
    let page = Arc::new(FilePage::new(url, file));
    let observer = PageObserver::for_page(&AdapterRegistry::default(), page, observer_config.clone())?;

    let product = match observer.start().await {
        PollOutcome::Detected(product) => product,
        PollOutcome::TimedOut => bail!(
            "no product detected within {}ms",
            observer_config.max_wait_ms
        ),
        PollOutcome::AlreadyStarted => bail!("observer already started"),
    };
    output(&PageEvent::Detected(product))?;

    let mut ticker = tokio::time::interval(observer_config.poll_interval());
    ticker.tick().await;
    for _ in 0..changes {
        ticker.tick().await;
        if let Some(event) = observer.on_page_changed().await {
            output(&event)?;
        }
    }
    Ok(())
}

async fn cmd_whoami(config: &Config, token: String) -> Result<()> {
    let backend = HttpBackend::new(&config.backend()).context("Failed to create backend client")?;
    let service = WatchlistService::new(Arc::new(MemoryStore::new()), Arc::new(backend));
    output(&service.check_auth(&Session::from_token(token)).await)
}
