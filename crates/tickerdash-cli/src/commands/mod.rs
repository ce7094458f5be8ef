mod dashboard;
mod dates;
mod serve;
mod tickers;

use std::path::PathBuf;

use serde_json::Value;
use tickerdash_core::DashboardApi;

pub use self::dashboard::DashboardReport;
use crate::cli::{Cli, Command};
use crate::config;
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub report: Option<DashboardReport>,
    pub output_path: Option<PathBuf>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            report: None,
            output_path: None,
        }
    }

    pub fn with_report(mut self, report: DashboardReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    /// Whether the page ended the cycle showing an error banner.
    pub fn has_error_banner(&self) -> bool {
        self.report
            .as_ref()
            .is_some_and(|report| report.view.error_message().is_some())
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Dashboard(args) => dashboard::run(args, api(cli)?).await,
        Command::Tickers(args) => tickers::run(args, &api(cli)?).await,
        Command::Dates(args) => dates::run(args),
        Command::Serve(args) => serve::run(args).await,
    }
}

fn api(cli: &Cli) -> Result<DashboardApi, CliError> {
    let base_url = config::base_url(cli.base_url.as_deref())?;
    Ok(DashboardApi::new(base_url).with_timeout_ms(cli.timeout_ms))
}
