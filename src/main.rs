//! Flight Search CLI - Search round-trip flight offers
//!
//! Validates the requested trip, answers repeated searches from a local
//! result cache, and otherwise asks the offer provider.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flightsearch::cache::{FileStore, KeyValueStore, MemoryStore, ResultCache};
use flightsearch::catalog::all_airports;
use flightsearch::cli::{CacheLocation, Cli, Command, SearchArgs, StartupConfig};
use flightsearch::client::HttpOfferClient;
use flightsearch::orchestrator::{SearchError, SearchOrchestrator};
use flightsearch::render::render_offers;

/// Exit code for rejected input (bad dates, same airport, unknown codes)
const EXIT_INVALID_INPUT: u8 = 2;

/// Exit code for a failed provider call
const EXIT_SEARCH_FAILED: u8 = 1;

/// Sets up stderr logging; `RUST_LOG` overrides the level picked by `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Picks the storage backend for the result cache
fn open_store(location: &CacheLocation) -> Arc<dyn KeyValueStore> {
    match location {
        CacheLocation::Dir(dir) => Arc::new(FileStore::with_dir(dir.clone())),
        CacheLocation::Default => match FileStore::new() {
            Some(store) => {
                tracing::debug!(dir = %store.dir().display(), "using on-disk cache");
                Arc::new(store)
            }
            None => {
                tracing::warn!("no cache directory available; results will not be cached between runs");
                Arc::new(MemoryStore::new())
            }
        },
        CacheLocation::Disabled => Arc::new(MemoryStore::new()),
    }
}

fn list_airports() -> ExitCode {
    for airport in all_airports() {
        println!("{}  {}", airport.code, airport.name);
    }
    ExitCode::SUCCESS
}

async fn run_search(args: &SearchArgs) -> ExitCode {
    let config = match StartupConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    let orchestrator = SearchOrchestrator::new(
        HttpOfferClient::with_endpoint(config.endpoint.clone()),
        ResultCache::new(open_store(&config.cache)),
    );

    let pending = match orchestrator.submit(&config.form) {
        Ok(pending) => pending,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    match pending.await {
        Ok(result) => {
            tracing::info!(source = ?result.source, count = result.offers.data.len(), "search complete");
            if config.json_output {
                match serde_json::to_string_pretty(&result.offers) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: failed to encode offers: {}", e);
                        return ExitCode::from(EXIT_SEARCH_FAILED);
                    }
                }
            } else {
                print!("{}", render_offers(&result.offers));
            }
            ExitCode::SUCCESS
        }
        Err(SearchError::Network(e)) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_SEARCH_FAILED)
        }
        Err(SearchError::Superseded) => {
            eprintln!("Error: {}", SearchError::Superseded);
            ExitCode::from(EXIT_SEARCH_FAILED)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Airports => list_airports(),
        Command::Search(args) => run_search(args).await,
    }
}
