//! Command-line interface parsing for the flight search CLI
//!
//! This module handles parsing of CLI arguments using clap and turns the
//! `search` subcommand into a `StartupConfig`: a raw trip form plus the runtime
//! settings for the provider endpoint, cache location and output format.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::catalog::{get_airport_by_code, is_supported_currency, CURRENCIES};
use crate::client::DEFAULT_ENDPOINT;
use crate::query::TripForm;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The airport code is not in the catalog
    #[error("Unknown airport: '{0}'. Run `flightsearch airports` to list valid codes")]
    UnknownAirport(String),

    /// The currency is not supported
    #[error("Unsupported currency: '{0}'. Valid currencies: {}", CURRENCIES.join(", "))]
    UnsupportedCurrency(String),
}

/// Flight Search CLI - Search round-trip flight offers
#[derive(Parser, Debug)]
#[command(name = "flightsearch")]
#[command(about = "Round-trip flight offer search with a local result cache")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for round-trip flight offers
    Search(SearchArgs),
    /// List the airports that can be searched
    Airports,
}

/// Arguments of the `search` subcommand
///
/// Examples:
///   flightsearch search --depart 2025-06-01 --return 2025-06-10 --from JFK --to LAX
///   flightsearch search --depart 2025-06-01 --return 2025-06-10 --from JFK --to LAX --adults 2 --currency EUR --json
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Departure date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub depart: String,

    /// Return date (YYYY-MM-DD)
    #[arg(long = "return", value_name = "DATE")]
    pub return_date: String,

    /// Origin airport code
    #[arg(long, value_name = "CODE")]
    pub from: String,

    /// Destination airport code
    #[arg(long, value_name = "CODE")]
    pub to: String,

    /// Number of adult passengers
    #[arg(long, default_value = "1", value_name = "N")]
    pub adults: String,

    /// Currency for prices
    #[arg(long, default_value = "USD", value_name = "CODE")]
    pub currency: String,

    /// Offer provider endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT, value_name = "URL")]
    pub endpoint: String,

    /// Directory for cached results (defaults to the platform cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Don't read or write the on-disk cache
    #[arg(long, conflicts_with = "cache_dir")]
    pub no_cache: bool,

    /// Print the raw offer JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Where search results are cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    /// Platform cache directory
    Default,
    /// Custom directory
    Dir(PathBuf),
    /// In-memory only, nothing persisted
    Disabled,
}

/// Configuration derived from the `search` arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// The trip form to submit
    pub form: TripForm,
    /// Offer provider endpoint
    pub endpoint: String,
    /// Where cached results live
    pub cache: CacheLocation,
    /// Whether to print raw JSON
    pub json_output: bool,
}

/// Checks an airport argument against the catalog
///
/// # Returns
/// * `Ok(())` if the code is listed
/// * `Err(CliError::UnknownAirport)` otherwise
pub fn check_airport_arg(code: &str) -> Result<(), CliError> {
    get_airport_by_code(code)
        .map(|_| ())
        .ok_or_else(|| CliError::UnknownAirport(code.to_string()))
}

/// Checks a currency argument against the supported list
pub fn check_currency_arg(code: &str) -> Result<(), CliError> {
    if is_supported_currency(code) {
        Ok(())
    } else {
        Err(CliError::UnsupportedCurrency(code.to_string()))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed search arguments.
    ///
    /// Airport and currency codes are checked against the catalog here; every
    /// other check belongs to trip validation.
    pub fn from_args(args: &SearchArgs) -> Result<Self, CliError> {
        check_airport_arg(&args.from)?;
        check_airport_arg(&args.to)?;
        check_currency_arg(&args.currency)?;

        let cache = match (&args.cache_dir, args.no_cache) {
            (_, true) => CacheLocation::Disabled,
            (Some(dir), false) => CacheLocation::Dir(dir.clone()),
            (None, false) => CacheLocation::Default,
        };

        Ok(StartupConfig {
            form: TripForm {
                departure_date: args.depart.clone(),
                return_date: args.return_date.clone(),
                origin: args.from.clone(),
                destination: args.to.clone(),
                adults: args.adults.clone(),
                currency: args.currency.clone(),
            },
            endpoint: args.endpoint.clone(),
            cache,
            json_output: args.json,
        })
    }
}
