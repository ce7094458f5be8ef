//! Plotly figure payloads for the candlestick and volume panels.

use serde_json::{json, Value};
use tickerdash_core::format_iso_date;

use crate::store::Bar;

const SHORT_WINDOW: usize = 20;
const LONG_WINDOW: usize = 50;

/// Trailing mean over `window` values; `None` until the window is full.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut averages = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (index, value) in values.iter().enumerate() {
        sum += value;
        if index >= window {
            sum -= values[index - window];
        }
        averages.push((index + 1 >= window).then(|| sum / window as f64));
    }
    averages
}

fn dates(bars: &[Bar]) -> Vec<String> {
    bars.iter().map(|bar| format_iso_date(bar.date)).collect()
}

fn margin() -> Value {
    json!({ "l": 0, "r": 0, "t": 30, "b": 0 })
}

/// OHLC trace with 20 and 50 day moving averages of the close.
pub fn candlestick_figure(bars: &[Bar]) -> Value {
    let x = dates(bars);
    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();

    json!({
        "data": [
            {
                "type": "candlestick",
                "name": "OHLC",
                "x": x,
                "open": bars.iter().map(|bar| bar.open).collect::<Vec<_>>(),
                "high": bars.iter().map(|bar| bar.high).collect::<Vec<_>>(),
                "low": bars.iter().map(|bar| bar.low).collect::<Vec<_>>(),
                "close": closes,
            },
            {
                "type": "scatter",
                "name": "20 MA",
                "x": x,
                "y": moving_average(&closes, SHORT_WINDOW),
                "line": { "color": "orange" },
            },
            {
                "type": "scatter",
                "name": "50 MA",
                "x": x,
                "y": moving_average(&closes, LONG_WINDOW),
                "line": { "color": "blue" },
            },
        ],
        "layout": {
            "height": 500,
            "margin": margin(),
            "xaxis": {
                "title": { "text": "Date" },
                "type": "date",
                "rangeslider": { "visible": false },
            },
            "yaxis": {
                "title": { "text": "Price (USD)" },
                "tickformat": "$,.2f",
            },
        },
    })
}

pub fn volume_figure(bars: &[Bar]) -> Value {
    json!({
        "data": [
            {
                "type": "bar",
                "name": "Volume",
                "x": dates(bars),
                "y": bars.iter().map(|bar| bar.volume).collect::<Vec<_>>(),
            },
        ],
        "layout": {
            "height": 300,
            "margin": margin(),
            "xaxis": {
                "title": { "text": "Date" },
                "type": "date",
            },
            "yaxis": { "title": { "text": "Volume" } },
        },
    })
}
