use serde::Serialize;
use tickerdash_core::{AssetType, DashboardApi, DashboardController, FormInput, UpdateOutcome, ViewState};
use time::OffsetDateTime;
use tracing::debug;

use crate::cli::DashboardArgs;
use crate::error::CliError;

use super::CommandResult;

/// Everything one dashboard cycle produced.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    /// The form after date validation, as it was submitted.
    pub form: FormInput,
    pub outcome: UpdateOutcome,
    pub view: ViewState,
}

pub async fn run(args: &DashboardArgs, api: DashboardApi) -> Result<CommandResult, CliError> {
    let asset_type = AssetType::parse(&args.asset_type)?;
    let today = OffsetDateTime::now_utc().date();

    let mut form = FormInput::with_default_dates(args.ticker.as_str(), asset_type, today);
    if let Some(start) = &args.start {
        form.start_date.clone_from(start);
    }
    if let Some(end) = &args.end {
        form.end_date.clone_from(end);
    }
    let range = form.validate_dates();
    debug!(%range, base_url = api.base_url(), "submitting dashboard form");

    let controller = DashboardController::new(api);
    let outcome = controller.update(&form).await;
    let report = DashboardReport {
        form,
        outcome,
        view: controller.snapshot(),
    };

    let data = serde_json::to_value(&report)?;
    Ok(CommandResult::ok(data)
        .with_report(report)
        .with_output_path(args.output.clone()))
}
