//! Metric cards built from the `metrics` field of the data response.

use serde::Serialize;
use serde_json::{Number, Value};

/// The six metrics the dashboard knows how to explain, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricKind {
    AverageVolume,
    DailyReturn,
    HighestPrice,
    LatestPrice,
    LowestPrice,
    Volatility30d,
}

impl MetricKind {
    pub const ALL: [Self; 6] = [
        Self::AverageVolume,
        Self::DailyReturn,
        Self::HighestPrice,
        Self::LatestPrice,
        Self::LowestPrice,
        Self::Volatility30d,
    ];

    /// Key in the metrics mapping, also used as the card label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::AverageVolume => "Average Volume",
            Self::DailyReturn => "Daily Return",
            Self::HighestPrice => "Highest Price",
            Self::LatestPrice => "Latest Price",
            Self::LowestPrice => "Lowest Price",
            Self::Volatility30d => "Volatility (30d)",
        }
    }

    pub const fn explanation(self) -> &'static str {
        match self {
            Self::AverageVolume => {
                "The typical number of shares traded daily. Higher volume often indicates more \
active trading and interest in the stock."
            }
            Self::DailyReturn => {
                "The percentage change in price from the previous trading day. Shows how much you \
would have gained or lost if you held the stock for one day."
            }
            Self::HighestPrice => {
                "The highest price the asset has reached in the selected time period. Useful for \
understanding the asset's peak value."
            }
            Self::LatestPrice => {
                "The most recent trading price of the asset. This is the current market value."
            }
            Self::LowestPrice => {
                "The lowest price the asset has reached in the selected time period. Shows the \
bottom of the price range."
            }
            Self::Volatility30d => {
                "A measure of price fluctuation over the last 30 days. Higher volatility means \
more price swings and potentially higher risk."
            }
        }
    }
}

/// A metric value that is allowed onto a card.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(Number),
    Text(String),
    Flag(bool),
}

impl MetricValue {
    /// Accept non-empty scalars only. Null, objects and arrays are rejected so
    /// a nested server payload is never printed as text; zero, `""` and
    /// `false` count as empty and get no card.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            Value::Number(number) => Some(Self::Number(number.clone())),
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Bool(false) => None,
            Value::Bool(flag) => Some(Self::Flag(*flag)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
            Self::Flag(flag) => flag.to_string(),
        }
    }
}

/// One rendered metric card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub explanation: &'static str,
}

/// Cards for every known metric with a scalar value, in [`MetricKind::ALL`] order.
///
/// A `metrics` value that is not an object yields no cards.
pub fn render_metrics(metrics: &Value) -> Vec<MetricCard> {
    MetricKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let value = metrics.get(kind.label()).and_then(MetricValue::from_json)?;
            Some(MetricCard {
                label: kind.label(),
                value: value.display(),
                explanation: kind.explanation(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn composite_values_are_skipped() {
        let cards = render_metrics(&json!({
            "Latest Price": 123.45,
            "Average Volume": {"nested": 1},
        }));

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].label, "Latest Price");
        assert_eq!(cards[0].value, "123.45");
        assert_eq!(cards[0].explanation, MetricKind::LatestPrice.explanation());
    }

    #[test]
    fn empty_scalars_get_no_card() {
        let cards = render_metrics(&json!({
            "Latest Price": "",
            "Daily Return": 0,
            "Highest Price": false,
            "Lowest Price": 0.0,
        }));
        assert!(cards.is_empty());

        assert_eq!(
            MetricValue::from_json(&json!(true)).map(|value| value.display()),
            Some(String::from("true"))
        );
        assert_eq!(
            MetricValue::from_json(&json!(-0.5)).map(|value| value.display()),
            Some(String::from("-0.5"))
        );
    }

    #[test]
    fn declaration_order_beats_response_order() {
        let cards = render_metrics(&json!({
            "Volatility (30d)": "1.20%",
            "Lowest Price": "$90.00",
            "Average Volume": "1,000",
            "Daily Return": "0.50%",
        }));

        let labels: Vec<_> = cards.iter().map(|card| card.label).collect();
        assert_eq!(
            labels,
            ["Average Volume", "Daily Return", "Lowest Price", "Volatility (30d)"]
        );
    }

    #[test]
    fn null_arrays_and_unknown_names_render_nothing() {
        let cards = render_metrics(&json!({
            "Highest Price": null,
            "Lowest Price": [1, 2],
            "Sharpe": 1.5,
        }));
        assert!(cards.is_empty());
    }

    #[test]
    fn non_object_metrics_render_nothing() {
        assert!(render_metrics(&json!("Latest Price")).is_empty());
    }

    #[test]
    fn every_kind_has_distinct_label() {
        let mut labels: Vec<_> = MetricKind::ALL.iter().map(|kind| kind.label()).collect();
        labels.dedup();
        assert_eq!(labels.len(), 6);
    }
}
