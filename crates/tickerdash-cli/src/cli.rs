//! CLI argument definitions for tickerdash.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | Run one dashboard update cycle and print the page state |
//! | `tickers` | List the tickers the server knows for an asset type |
//! | `dates` | Show how a date pair is clamped to the data window |
//! | `serve` | Run the reference data server |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table, html) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--base-url` | `$TICKERDASH_BASE_URL` or `http://127.0.0.1:5000` | Dashboard server |
//! | `--timeout-ms` | none | Per-request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! tickerdash serve --data-dir ./data
//! tickerdash dashboard --ticker AAPL --start 2024-01-01 --end 2024-06-30 --pretty
//! tickerdash dashboard --ticker 0700.HK --format html --output dashboard.html
//! tickerdash tickers --asset-type crypto
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Asset dashboard client and reference server.
#[derive(Debug, Parser)]
#[command(
    name = "tickerdash",
    author,
    version,
    about = "Financial asset dashboard client and reference data server"
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - json: Single JSON object (default)
    /// - table: Plain text for terminal display
    /// - html: Standalone page with the charts (dashboard only)
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Base URL of the dashboard server.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds. No timeout when omitted.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Html,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one update cycle for a ticker and print the resulting page.
    ///
    /// Exits with code 3 when the cycle ends with an error banner.
    ///
    /// # Examples
    ///
    ///   tickerdash dashboard --ticker AAPL
    ///   tickerdash dashboard --ticker BTC-USD --asset-type crypto --start 2023-01-01
    Dashboard(DashboardArgs),

    /// List the tickers available for an asset type.
    Tickers(TickersArgs),

    /// Clamp a start/end pair to the supported data window.
    Dates(DatesArgs),

    /// Serve `/get_tickers` and `/get_data` from CSV bar files.
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Ticker symbol, including any exchange suffix (e.g. 0700.HK).
    #[arg(long)]
    pub ticker: String,

    /// One of stock, etf, crypto.
    #[arg(long, default_value = "stock")]
    pub asset_type: String,

    /// Start date (YYYY-MM-DD). Defaults to 30 days ago.
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<String>,

    /// Write the output to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TickersArgs {
    #[arg(long, default_value = "stock")]
    pub asset_type: String,
}

#[derive(Debug, Args)]
pub struct DatesArgs {
    #[arg(long, default_value = "")]
    pub start: String,

    #[arg(long, default_value = "")]
    pub end: String,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Directory holding stock.csv, etf.csv and crypto.csv.
    ///
    /// Falls back to `$TICKERDASH_DATA_DIR`, then `./data`.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "tickerdash",
            "dashboard",
            "--ticker",
            "aapl",
            "--format",
            "table",
            "--timeout-ms",
            "1500",
        ])
        .expect("parses");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.timeout_ms, Some(1500));
        let Command::Dashboard(args) = cli.command else {
            panic!("expected dashboard command");
        };
        assert_eq!(args.ticker, "aapl");
        assert_eq!(args.asset_type, "stock");
        assert!(args.start.is_none());
    }

    #[test]
    fn serve_defaults_to_local_port() {
        let cli = Cli::try_parse_from(["tickerdash", "serve"]).expect("parses");
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.bind.port(), 5000);
        assert!(args.data_dir.is_none());
    }
}
