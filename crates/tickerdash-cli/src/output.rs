pub mod html;

use std::fs::File;
use std::io::{self, BufWriter, Write};

use tickerdash_core::{ChartKind, ChartPanel, MetricsPanel, UpdateOutcome};
use tracing::info;

use crate::cli::OutputFormat;
use crate::commands::{CommandResult, DashboardReport};
use crate::error::CliError;

/// Write `result` to its output file, or stdout when it has none.
pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match &result.output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_result(&mut writer, result, format, pretty)?;
            writer.flush()?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_result(&mut writer, result, format, pretty)?;
        }
    }
    Ok(())
}

pub fn write_result<W: Write>(
    writer: &mut W,
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&result.data)?
            } else {
                serde_json::to_string(&result.data)?
            };
            writeln!(writer, "{payload}")?;
        }
        OutputFormat::Table => match &result.report {
            Some(report) => write_report_table(writer, report)?,
            None => write_data_table(writer, result)?,
        },
        OutputFormat::Html => {
            let report = result.report.as_ref().ok_or_else(|| {
                CliError::Command(String::from(
                    "--format html only applies to the dashboard command",
                ))
            })?;
            writer.write_all(html::render_page(report)?.as_bytes())?;
        }
    }
    Ok(())
}

fn write_data_table<W: Write>(writer: &mut W, result: &CommandResult) -> Result<(), CliError> {
    writeln!(writer, "data:")?;
    let pretty_data = serde_json::to_string_pretty(&result.data)?;
    for line in pretty_data.lines() {
        writeln!(writer, "  {line}")?;
    }
    Ok(())
}

fn write_report_table<W: Write>(writer: &mut W, report: &DashboardReport) -> Result<(), CliError> {
    let form = &report.form;
    writeln!(writer, "ticker      : {}", form.ticker.trim().to_uppercase())?;
    writeln!(writer, "asset_type  : {}", form.asset_type)?;
    writeln!(writer, "range       : {} to {}", form.start_date, form.end_date)?;
    writeln!(writer, "outcome     : {}", outcome_label(&report.outcome))?;

    writeln!(writer, "metrics:")?;
    match &report.view.metrics {
        MetricsPanel::Empty => writeln!(writer, "  (empty)")?,
        MetricsPanel::Loading => writeln!(writer, "  Loading...")?,
        MetricsPanel::Error(message) => writeln!(writer, "  error: {message}")?,
        MetricsPanel::Cards(cards) => {
            let width = cards.iter().map(|card| card.label.len()).max().unwrap_or(0);
            for card in cards {
                writeln!(writer, "  {:<width$}  {}", card.label, card.value)?;
            }
        }
    }

    writeln!(writer, "charts:")?;
    for kind in [ChartKind::Candlestick, ChartKind::Volume] {
        let status = match report.view.charts.panel(kind) {
            ChartPanel::Empty => String::from("empty"),
            ChartPanel::Plot(figure) => format!("plot ({} traces)", figure.data.len()),
            ChartPanel::Warning(message) => format!("warning: {message}"),
            ChartPanel::Error(message) => format!("error: {message}"),
        };
        writeln!(writer, "  {:<16}  {status}", kind.container_id())?;
    }
    Ok(())
}

fn outcome_label(outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::Rendered { .. } => String::from("rendered"),
        UpdateOutcome::Failed { stage, .. } => format!("failed at {}", stage_label(*stage)),
        UpdateOutcome::Superseded { .. } => String::from("superseded"),
    }
}

const fn stage_label(stage: tickerdash_core::Stage) -> &'static str {
    match stage {
        tickerdash_core::Stage::Validate => "validate",
        tickerdash_core::Stage::TickerCheck => "ticker check",
        tickerdash_core::Stage::DataFetch => "data fetch",
    }
}
