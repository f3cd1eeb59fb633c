//! CLI argument definitions for ferrocast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `forecast` | Fetch history, test stationarity and forecast closing prices |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | from `FERROCAST_HTTP_TIMEOUT_MS` | Provider request timeout |
//!
//! # Examples
//!
//! ```bash
//! ferrocast forecast --ticker 7203.T --start 2024-01-01 --end 2025-11-01 --horizon 10
//! ferrocast forecast --ticker AAPL --format table --chart aapl.svg
//! ferrocast forecast --offline --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ferrocast_core::pipeline::DEFAULT_HORIZON;

/// Stationarity checks and ARIMA(5,1,0) price forecasts for one ticker.
#[derive(Debug, Parser)]
#[command(name = "ferrocast", author, version, about)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Provider request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary for terminal display.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one forecast: fetch, test stationarity, fit and predict.
    ///
    /// # Examples
    ///
    ///   ferrocast forecast --ticker 7203.T
    ///   ferrocast forecast --ticker AAPL --horizon 30 --chart aapl.svg
    Forecast(ForecastArgs),
}

/// Arguments for the `forecast` command.
#[derive(Debug, Clone, Args)]
pub struct ForecastArgs {
    /// Ticker symbol, e.g. 7203.T, AAPL or ^N225.
    #[arg(long, default_value = "7203.T")]
    pub ticker: String,

    /// First day of history (YYYY-MM-DD, inclusive).
    #[arg(long, default_value = "2024-01-01")]
    pub start: String,

    /// Last day of history (YYYY-MM-DD, exclusive).
    #[arg(long, default_value = "2025-11-01")]
    pub end: String,

    /// Number of business days to forecast (5 to 60).
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Write the actual-vs-forecast chart to this SVG file.
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Use deterministic synthetic prices instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}
