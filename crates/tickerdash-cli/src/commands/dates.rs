use serde::Serialize;
use tickerdash_core::DateRange;

use crate::cli::DatesArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct DatesResponseData<'a> {
    input_start: &'a str,
    input_end: &'a str,
    range: DateRange,
    window: DateRange,
}

pub fn run(args: &DatesArgs) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(DatesResponseData {
        input_start: &args.start,
        input_end: &args.end,
        range: DateRange::from_inputs(&args.start, &args.end),
        window: DateRange::default(),
    })?;
    Ok(CommandResult::ok(data))
}
