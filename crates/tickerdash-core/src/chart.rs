//! Themed plot configurations for the candlestick and volume charts.
//!
//! The server sends Plotly-style figures (`{data, layout}`), sometimes
//! JSON-encoded inside a string. [`render_charts`] parses both, deep-merges
//! the dashboard theme into them and returns what each chart container
//! should display. Drawing is left to a [`PlotSink`].

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::error;

use crate::ChartError;

/// Dashboard colour palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub olive_green: &'static str,
    pub olive_green_light: &'static str,
    pub decreasing: &'static str,
    pub background: &'static str,
    pub grid_color: &'static str,
    pub text_color: &'static str,
}

pub const THEME: Theme = Theme {
    olive_green: "#556B2F",
    olive_green_light: "#6B8E23",
    decreasing: "#d32f2f",
    background: "#f8f9fa",
    grid_color: "#e9ecef",
    text_color: "#212529",
};

const TITLE_FONT_SIZE: u8 = 16;
const AXIS_TITLE_FONT_SIZE: u8 = 14;
const TICK_FONT_SIZE: u8 = 12;

/// The two charts of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Candlestick,
    Volume,
}

impl ChartKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Candlestick => "candlestick",
            Self::Volume => "volume",
        }
    }

    /// Id of the container the chart is drawn into.
    pub const fn container_id(self) -> &'static str {
        match self {
            Self::Candlestick => "candlestickChart",
            Self::Volume => "volumeChart",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Candlestick => "Price History",
            Self::Volume => "Volume",
        }
    }

    pub const fn y_axis_title(self) -> &'static str {
        match self {
            Self::Candlestick => "Price",
            Self::Volume => "Volume",
        }
    }

    pub const fn missing_message(self) -> &'static str {
        match self {
            Self::Candlestick => "No chart data available",
            Self::Volume => "No volume data available",
        }
    }
}

/// A finished figure ready for the plotting library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotFigure {
    pub data: Vec<Value>,
    pub layout: Value,
    pub config: Value,
}

/// What one chart container shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum ChartPanel {
    Empty,
    Plot(PlotFigure),
    Warning(String),
    Error(String),
}

impl ChartPanel {
    pub fn figure(&self) -> Option<&PlotFigure> {
        match self {
            Self::Plot(figure) => Some(figure),
            _ => None,
        }
    }
}

/// Contents of both chart containers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartsView {
    pub candlestick: ChartPanel,
    pub volume: ChartPanel,
}

impl Default for ChartsView {
    fn default() -> Self {
        Self {
            candlestick: ChartPanel::Empty,
            volume: ChartPanel::Empty,
        }
    }
}

impl ChartsView {
    pub fn panel(&self, kind: ChartKind) -> &ChartPanel {
        match kind {
            ChartKind::Candlestick => &self.candlestick,
            ChartKind::Volume => &self.volume,
        }
    }

    fn missing() -> Self {
        Self {
            candlestick: ChartPanel::Warning(ChartKind::Candlestick.missing_message().to_owned()),
            volume: ChartPanel::Warning(ChartKind::Volume.missing_message().to_owned()),
        }
    }

    fn failed(error: &ChartError) -> Self {
        let message = format!("Error creating charts: {error}");
        Self {
            candlestick: ChartPanel::Error(message.clone()),
            volume: ChartPanel::Error(message),
        }
    }

    /// Hand every plotted figure to `sink`, bound to its container id.
    pub fn submit<S: PlotSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        for kind in [ChartKind::Candlestick, ChartKind::Volume] {
            if let Some(figure) = self.panel(kind).figure() {
                sink.new_plot(kind.container_id(), figure)?;
            }
        }
        Ok(())
    }
}

/// The external plotting call.
pub trait PlotSink {
    type Error;

    fn new_plot(&mut self, target: &str, figure: &PlotFigure) -> Result<(), Self::Error>;
}

/// Build both chart panels.
///
/// A missing payload (absent, null or an empty string) on either side puts
/// a warning in both containers. Any parse or merge failure puts the same
/// error message in both; there is no per-chart isolation.
pub fn render_charts(candlestick: Option<&Value>, volume: Option<&Value>) -> ChartsView {
    let (Some(candlestick), Some(volume)) = (present(candlestick), present(volume)) else {
        return ChartsView::missing();
    };

    let themed = theme_figure(ChartKind::Candlestick, candlestick).and_then(|candlestick| {
        theme_figure(ChartKind::Volume, volume).map(|volume| (candlestick, volume))
    });

    match themed {
        Ok((candlestick, volume)) => ChartsView {
            candlestick: ChartPanel::Plot(candlestick),
            volume: ChartPanel::Plot(volume),
        },
        Err(chart_error) => {
            error!(error = %chart_error, "error updating charts");
            ChartsView::failed(&chart_error)
        }
    }
}

/// Parse one payload and apply the theme for `kind`.
pub fn theme_figure(kind: ChartKind, payload: &Value) -> Result<PlotFigure, ChartError> {
    let mut payload = parse_payload(kind, payload)?;

    let mut layout = match payload.remove("layout") {
        Some(layout @ Value::Object(_)) => layout,
        _ => Value::Object(Map::new()),
    };
    merge_json(&mut layout, themed_layout(kind));

    let traces = match payload.remove("data") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(traces)) => traces,
        Some(_) => {
            return Err(ChartError::DataNotArray {
                chart: kind.as_str(),
            })
        }
    };

    let data = traces
        .into_iter()
        .enumerate()
        .map(|(index, mut trace)| {
            if !trace.is_object() {
                return Err(ChartError::TraceNotObject {
                    chart: kind.as_str(),
                    index,
                });
            }
            merge_json(&mut trace, trace_overrides(kind));
            Ok(trace)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlotFigure {
        data,
        layout,
        config: plot_config(),
    })
}

/// Recursively merge `overlay` into `target`.
///
/// Objects merge key by key; any other overlay value replaces the target.
pub fn merge_json(target: &mut Value, overlay: Value) {
    match (target, overlay) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}

fn present(payload: Option<&Value>) -> Option<&Value> {
    payload.filter(|value| match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    })
}

fn parse_payload(kind: ChartKind, payload: &Value) -> Result<Map<String, Value>, ChartError> {
    let parsed = match payload {
        Value::String(text) => {
            serde_json::from_str(text).map_err(|e| ChartError::InvalidJson {
                chart: kind.as_str(),
                message: e.to_string(),
            })?
        }
        other => other.clone(),
    };

    match parsed {
        Value::Object(map) => Ok(map),
        _ => Err(ChartError::NotAnObject {
            chart: kind.as_str(),
        }),
    }
}

fn axis_style(title: &str) -> Value {
    json!({
        "title": {
            "text": title,
            "font": { "size": AXIS_TITLE_FONT_SIZE, "color": THEME.text_color },
        },
        "tickfont": { "size": TICK_FONT_SIZE, "color": THEME.text_color },
        "gridcolor": THEME.grid_color,
        "linecolor": THEME.grid_color,
        "showgrid": true,
    })
}

fn themed_layout(kind: ChartKind) -> Value {
    json!({
        "paper_bgcolor": THEME.background,
        "plot_bgcolor": THEME.background,
        "font": { "color": THEME.text_color },
        "title": {
            "text": kind.title(),
            "font": { "size": TITLE_FONT_SIZE, "color": THEME.text_color },
        },
        "xaxis": axis_style("Date"),
        "yaxis": axis_style(kind.y_axis_title()),
        "margin": { "t": 30, "l": 60, "r": 20, "b": 40 },
    })
}

fn trace_overrides(kind: ChartKind) -> Value {
    match kind {
        ChartKind::Candlestick => json!({
            "increasing": { "line": { "color": THEME.olive_green } },
            "decreasing": { "line": { "color": THEME.decreasing } },
            "line": { "color": THEME.olive_green },
        }),
        ChartKind::Volume => json!({
            "marker": {
                "color": THEME.olive_green_light,
                "line": { "color": THEME.olive_green },
            },
        }),
    }
}

fn plot_config() -> Value {
    json!({
        "responsive": true,
        "displayModeBar": true,
        "displaylogo": false,
        "modeBarButtonsToRemove": ["lasso2d"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candlestick_payload() -> Value {
        json!({
            "data": [{
                "type": "candlestick",
                "name": "OHLC",
                "x": ["2024-01-02"],
                "open": [10.0], "high": [12.0], "low": [9.5], "close": [11.5],
                "increasing": { "fillcolor": "#00ff00", "line": { "color": "#00ff00" } },
            }],
            "layout": {
                "height": 500,
                "xaxis": { "type": "date", "title": "Date" },
                "yaxis": { "tickformat": "$,.2f" },
            },
        })
    }

    fn volume_payload() -> Value {
        json!({
            "data": [{ "type": "bar", "y": [1000], "marker": { "opacity": 0.7 } }],
            "layout": { "height": 300 },
        })
    }

    #[test]
    fn increasing_candles_take_olive_green() {
        let view = render_charts(Some(&candlestick_payload()), Some(&volume_payload()));
        let figure = view.candlestick.figure().expect("plotted");

        assert_eq!(figure.data[0]["increasing"]["line"]["color"], THEME.olive_green);
        assert_eq!(figure.data[0]["decreasing"]["line"]["color"], THEME.decreasing);
        assert_eq!(figure.data[0]["line"]["color"], THEME.olive_green);
        assert_eq!(figure.data[0]["increasing"]["fillcolor"], "#00ff00");
    }

    #[test]
    fn layout_theme_overrides_titles_and_keeps_other_settings() {
        let view = render_charts(Some(&candlestick_payload()), Some(&volume_payload()));
        let layout = &view.candlestick.figure().expect("plotted").layout;

        assert_eq!(layout["paper_bgcolor"], THEME.background);
        assert_eq!(layout["plot_bgcolor"], THEME.background);
        assert_eq!(layout["title"]["text"], "Price History");
        assert_eq!(layout["title"]["font"]["size"], 16);
        assert_eq!(layout["xaxis"]["title"]["text"], "Date");
        assert_eq!(layout["xaxis"]["title"]["font"]["size"], 14);
        assert_eq!(layout["yaxis"]["title"]["text"], "Price");
        assert_eq!(layout["yaxis"]["tickfont"]["size"], 12);
        assert_eq!(layout["margin"], json!({"t": 30, "l": 60, "r": 20, "b": 40}));
        assert_eq!(layout["xaxis"]["type"], "date");
        assert_eq!(layout["yaxis"]["tickformat"], "$,.2f");
        assert_eq!(layout["height"], 500);
    }

    #[test]
    fn volume_markers_are_recoloured_but_keep_other_properties() {
        let view = render_charts(Some(&candlestick_payload()), Some(&volume_payload()));
        let figure = view.volume.figure().expect("plotted");

        assert_eq!(figure.data[0]["marker"]["color"], THEME.olive_green_light);
        assert_eq!(figure.data[0]["marker"]["line"]["color"], THEME.olive_green);
        assert_eq!(figure.data[0]["marker"]["opacity"], 0.7);
        assert_eq!(figure.layout["yaxis"]["title"]["text"], "Volume");
        assert_eq!(figure.config["modeBarButtonsToRemove"], json!(["lasso2d"]));
    }

    #[test]
    fn string_encoded_payloads_are_parsed() {
        let candlestick = Value::String(candlestick_payload().to_string());
        let volume = Value::String(volume_payload().to_string());

        let view = render_charts(Some(&candlestick), Some(&volume));
        assert!(view.candlestick.figure().is_some());
        assert!(view.volume.figure().is_some());
    }

    #[test]
    fn missing_payload_warns_in_both_containers() {
        let view = render_charts(Some(&Value::Null), Some(&volume_payload()));

        assert_eq!(
            view.candlestick,
            ChartPanel::Warning(String::from("No chart data available"))
        );
        assert_eq!(
            view.volume,
            ChartPanel::Warning(String::from("No volume data available"))
        );
        assert_eq!(render_charts(Some(&candlestick_payload()), None), view);
    }

    #[test]
    fn one_bad_payload_fails_both_charts() {
        let broken = Value::String(String::from("{not json"));
        let view = render_charts(Some(&candlestick_payload()), Some(&broken));

        let ChartPanel::Error(message) = &view.candlestick else {
            panic!("expected error panel, got {:?}", view.candlestick);
        };
        assert!(message.starts_with("Error creating charts: volume payload is not valid JSON"));
        assert_eq!(view.volume, view.candlestick);
    }

    #[test]
    fn non_array_data_is_a_chart_error() {
        let payload = json!({ "data": {} });
        let err = theme_figure(ChartKind::Volume, &payload).expect_err("must fail");
        assert_eq!(err, ChartError::DataNotArray { chart: "volume" });
        assert_eq!(err.to_string(), "volume data must be an array of traces");
    }

    #[test]
    fn non_object_trace_is_a_chart_error() {
        let payload = json!({ "data": [42] });
        let err = theme_figure(ChartKind::Candlestick, &payload).expect_err("must fail");
        assert_eq!(
            err,
            ChartError::TraceNotObject {
                chart: "candlestick",
                index: 0
            }
        );
    }

    #[test]
    fn merge_replaces_scalars_with_objects() {
        let mut target = json!({ "title": "Old", "keep": 1 });
        merge_json(&mut target, json!({ "title": { "text": "New" } }));
        assert_eq!(target, json!({ "title": { "text": "New" }, "keep": 1 }));
    }

    #[derive(Default)]
    struct RecordingSink {
        targets: Vec<String>,
    }

    impl PlotSink for RecordingSink {
        type Error = std::convert::Infallible;

        fn new_plot(&mut self, target: &str, _figure: &PlotFigure) -> Result<(), Self::Error> {
            self.targets.push(target.to_owned());
            Ok(())
        }
    }

    #[test]
    fn submit_binds_figures_to_container_ids() {
        let view = render_charts(Some(&candlestick_payload()), Some(&volume_payload()));
        let mut sink = RecordingSink::default();
        view.submit(&mut sink).expect("infallible");
        assert_eq!(sink.targets, ["candlestickChart", "volumeChart"]);

        let mut sink = RecordingSink::default();
        ChartsView::missing().submit(&mut sink).expect("infallible");
        assert!(sink.targets.is_empty());
    }
}
