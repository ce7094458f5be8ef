//! Standalone HTML page for one dashboard cycle.
//!
//! The page mirrors the dashboard layout: a `metricsContainer` with metric
//! cards or a banner, then the `candlestickChart` and `volumeChart`
//! containers. Plotted figures are drawn by inline `Plotly.newPlot` calls.

use tickerdash_core::{
    format_iso_date, AssetType, ChartKind, ChartPanel, MetricCard, MetricsPanel, PlotFigure,
    PlotSink, MAX_DATE, METRICS_CONTAINER_ID, MIN_DATE, THEME,
};

use crate::commands::DashboardReport;
use crate::error::CliError;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// Collects `Plotly.newPlot` calls for the page script.
#[derive(Debug, Default)]
pub struct HtmlPlotSink {
    calls: Vec<String>,
}

impl HtmlPlotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self) -> String {
        self.calls.join("\n")
    }
}

impl PlotSink for HtmlPlotSink {
    type Error = serde_json::Error;

    fn new_plot(&mut self, target: &str, figure: &PlotFigure) -> Result<(), Self::Error> {
        let call = format!(
            "Plotly.newPlot({}, {}, {}, {});",
            script_json(&target)?,
            script_json(&figure.data)?,
            script_json(&figure.layout)?,
            script_json(&figure.config)?,
        );
        self.calls.push(call);
        Ok(())
    }
}

/// JSON that is safe to inline in a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn render_page(report: &DashboardReport) -> Result<String, CliError> {
    let mut sink = HtmlPlotSink::new();
    report.view.charts.submit(&mut sink)?;

    let ticker = escape(&report.form.ticker.trim().to_uppercase());
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{ticker} | tickerdash</title>
<script src="{PLOTLY_CDN}"></script>
<style>
{style}
</style>
</head>
<body>
<main class="container">
<h1>{ticker} <small>{asset_type}</small></h1>
<form id="analysisForm" class="form-row">
<input id="ticker" name="ticker" value="{ticker}" readonly>
<select id="assetType" name="asset_type" disabled>{asset_options}</select>
<input id="startDate" name="start_date" type="date" value="{start}" min="{min_date}" max="{max_date}" readonly>
<input id="endDate" name="end_date" type="date" value="{end}" min="{min_date}" max="{max_date}" readonly>
</form>
<div id="{METRICS_CONTAINER_ID}" class="metrics-grid">
{metrics}</div>
<div id="{candlestick_id}" class="chart">{candlestick}</div>
<div id="{volume_id}" class="chart">{volume}</div>
</main>
<script>
{script}
</script>
</body>
</html>
"#,
        style = style(),
        asset_type = report.form.asset_type,
        asset_options = asset_options(report.form.asset_type),
        min_date = format_iso_date(MIN_DATE),
        max_date = format_iso_date(MAX_DATE),
        start = escape(&report.form.start_date),
        end = escape(&report.form.end_date),
        metrics = metrics_html(&report.view.metrics),
        candlestick_id = ChartKind::Candlestick.container_id(),
        candlestick = chart_html(report.view.charts.panel(ChartKind::Candlestick)),
        volume_id = ChartKind::Volume.container_id(),
        volume = chart_html(report.view.charts.panel(ChartKind::Volume)),
        script = sink.script(),
    ))
}

fn asset_options(selected: AssetType) -> String {
    AssetType::ALL
        .into_iter()
        .map(|asset_type| {
            let marker = if asset_type == selected { " selected" } else { "" };
            format!("<option value=\"{asset_type}\"{marker}>{asset_type}</option>")
        })
        .collect()
}

fn metrics_html(panel: &MetricsPanel) -> String {
    match panel {
        MetricsPanel::Empty => String::new(),
        MetricsPanel::Loading => String::from("<div class=\"loading\">Loading...</div>\n"),
        MetricsPanel::Error(message) => {
            format!("<div class=\"alert alert-danger\">{}</div>\n", escape(message))
        }
        MetricsPanel::Cards(cards) => cards.iter().map(card_html).collect(),
    }
}

fn card_html(card: &MetricCard) -> String {
    format!(
        "<div class=\"metric-card\" data-bs-toggle=\"tooltip\" title=\"{explanation}\">\n  <div class=\"metric-label\">{}</div>\n  <div class=\"metric-value\">{}</div>\n  <div class=\"metric-explanation\">{explanation}</div>\n</div>\n",
        escape(card.label),
        escape(&card.value),
        explanation = escape(card.explanation),
    )
}

fn chart_html(panel: &ChartPanel) -> String {
    match panel {
        ChartPanel::Empty | ChartPanel::Plot(_) => String::new(),
        ChartPanel::Warning(message) => {
            format!("<div class=\"alert alert-warning\">{}</div>", escape(message))
        }
        ChartPanel::Error(message) => {
            format!("<div class=\"alert alert-danger\">{}</div>", escape(message))
        }
    }
}

fn style() -> String {
    format!(
        "body {{ background: {background}; color: {text}; font-family: system-ui, sans-serif; margin: 0; }}
.container {{ max-width: 1100px; margin: 0 auto; padding: 24px; }}
h1 small {{ color: {light}; font-size: 0.6em; text-transform: uppercase; }}
.metrics-grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; }}
.metric-card {{ background: #fff; border-left: 4px solid {olive}; border-radius: 6px; padding: 12px 16px; }}
.metric-label {{ font-size: 0.85em; color: {light}; }}
.metric-value {{ font-size: 1.4em; font-weight: 600; }}
.metric-explanation {{ font-size: 0.8em; color: #6c757d; }}
.form-row {{ display: flex; gap: 8px; margin-bottom: 16px; }}
.chart {{ margin-top: 24px; }}
.alert {{ padding: 12px 16px; border-radius: 6px; }}
.alert-danger {{ background: #f8d7da; color: {decreasing}; }}
.alert-warning {{ background: #fff3cd; color: #856404; }}
.loading {{ color: {light}; }}",
        background = THEME.background,
        text = THEME.text_color,
        light = THEME.olive_green_light,
        olive = THEME.olive_green,
        decreasing = THEME.decreasing,
    )
}
