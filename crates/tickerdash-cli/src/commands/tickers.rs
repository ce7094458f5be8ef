use serde::Serialize;
use tickerdash_core::{AssetType, DashboardApi};

use crate::cli::TickersArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct TickersResponseData {
    asset_type: AssetType,
    tickers: Vec<String>,
}

pub async fn run(args: &TickersArgs, api: &DashboardApi) -> Result<CommandResult, CliError> {
    let asset_type = AssetType::parse(&args.asset_type)?;
    let tickers = api.ticker_list(asset_type).await?;

    let data = serde_json::to_value(TickersResponseData { asset_type, tickers })?;
    Ok(CommandResult::ok(data))
}
