//! Summary metrics and descriptive statistics over a bar series.

use serde_json::{json, Map, Value};
use tickerdash_core::MetricKind;

use crate::store::Bar;

const VOLATILITY_WINDOW: usize = 30;

/// Pre-formatted metric strings keyed by [`MetricKind::label`].
///
/// A metric is left out when the series is too short to define it.
pub fn compute_metrics(bars: &[Bar]) -> Map<String, Value> {
    let mut metrics = Map::new();
    let Some(last) = bars.last() else {
        return metrics;
    };

    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
    let returns = daily_returns(&closes);

    insert(&mut metrics, MetricKind::LatestPrice, format_usd(last.close));

    if let Some(latest_return) = returns.last().copied().filter(|value| value.is_finite()) {
        insert(&mut metrics, MetricKind::DailyReturn, format_percent(latest_return));
    }

    if returns.len() >= VOLATILITY_WINDOW {
        let window = &returns[returns.len() - VOLATILITY_WINDOW..];
        if let Some(volatility) = sample_std(window).filter(|value| value.is_finite()) {
            insert(&mut metrics, MetricKind::Volatility30d, format_percent(volatility));
        }
    }

    let volumes: Vec<f64> = bars.iter().map(|bar| bar.volume).collect();
    if let Some(average) = mean(&volumes) {
        insert(&mut metrics, MetricKind::AverageVolume, format_thousands(average));
    }

    let highest = bars.iter().map(|bar| bar.high).fold(f64::NEG_INFINITY, f64::max);
    let lowest = bars.iter().map(|bar| bar.low).fold(f64::INFINITY, f64::min);
    insert(&mut metrics, MetricKind::HighestPrice, format_usd(highest));
    insert(&mut metrics, MetricKind::LowestPrice, format_usd(lowest));

    metrics
}

/// Count, mean, std, min and max per OHLCV column, rounded to cents.
pub fn describe(bars: &[Bar]) -> Value {
    let columns: [(&str, fn(&Bar) -> f64); 5] = [
        ("open", |bar| bar.open),
        ("high", |bar| bar.high),
        ("low", |bar| bar.low),
        ("close", |bar| bar.close),
        ("volume", |bar| bar.volume),
    ];

    let mut stats = Map::new();
    for (name, column) in columns {
        let values: Vec<f64> = bars.iter().map(column).collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        stats.insert(
            name.to_owned(),
            json!({
                "count": values.len(),
                "mean": mean(&values).map(round2),
                "std": sample_std(&values).map(round2),
                "min": (!values.is_empty()).then(|| round2(min)),
                "max": (!values.is_empty()).then(|| round2(max)),
            }),
        );
    }
    Value::Object(stats)
}

/// Close-to-close fractional change; one shorter than `closes`.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with Bessel's correction.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn insert(metrics: &mut Map<String, Value>, kind: MetricKind, value: String) {
    metrics.insert(kind.label().to_owned(), Value::String(value));
}

pub fn format_usd(value: f64) -> String {
    format!("${value:.2}")
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Round to a whole number and group thousands with commas.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
