use serde_json::json;
use tickerdash_server::BarStore;
use tracing::info;

use crate::cli::ServeArgs;
use crate::config;
use crate::error::CliError;

use super::CommandResult;

/// Serve until interrupted.
pub async fn run(args: &ServeArgs) -> Result<CommandResult, CliError> {
    let data_dir = config::data_dir(args.data_dir.as_deref());
    let store = BarStore::load_dir(&data_dir)?;
    info!(data_dir = %data_dir.display(), bind = %args.bind, "starting reference server");

    tokio::select! {
        served = tickerdash_server::serve(store, args.bind) => served?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("shutting down");
        }
    }

    Ok(CommandResult::ok(json!({
        "status": "stopped",
        "bind": args.bind.to_string(),
        "data_dir": data_dir.display().to_string(),
    })))
}
