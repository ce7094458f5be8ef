//! Explicit view state of the dashboard page.
//!
//! Each container is addressed by the element id the page uses. The
//! metrics container's status content is written only through
//! [`ViewState::show_loading`], [`ViewState::hide_loading`] and
//! [`ViewState::show_error`], and each of them clears what was there.

use serde::Serialize;

use crate::chart::ChartsView;
use crate::metrics::MetricCard;

pub const METRICS_CONTAINER_ID: &str = "metricsContainer";

/// Contents of the metrics container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum MetricsPanel {
    #[default]
    Empty,
    Loading,
    Cards(Vec<MetricCard>),
    Error(String),
}

/// The whole page: metrics container plus both chart containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    /// Id of the update cycle that last wrote this state.
    pub request_id: Option<u64>,
    pub metrics: MetricsPanel,
    pub charts: ChartsView,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_loading(&mut self) {
        self.metrics = MetricsPanel::Loading;
    }

    /// Remove the loading indicator if it is showing; anything else is left alone.
    pub fn hide_loading(&mut self) {
        if self.metrics == MetricsPanel::Loading {
            self.metrics = MetricsPanel::Empty;
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.metrics = MetricsPanel::Error(message.into());
    }

    pub fn show_metrics(&mut self, cards: Vec<MetricCard>) {
        self.metrics = MetricsPanel::Cards(cards);
    }

    pub fn show_charts(&mut self, charts: ChartsView) {
        self.charts = charts;
    }

    pub fn is_loading(&self) -> bool {
        self.metrics == MetricsPanel::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.metrics {
            MetricsPanel::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn metric_cards(&self) -> &[MetricCard] {
        match &self.metrics {
            MetricsPanel::Cards(cards) => cards,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricKind;

    fn card() -> MetricCard {
        MetricCard {
            label: MetricKind::LatestPrice.label(),
            value: String::from("$10.00"),
            explanation: MetricKind::LatestPrice.explanation(),
        }
    }

    #[test]
    fn hide_loading_is_idempotent() {
        let mut view = ViewState::new();
        view.show_loading();
        assert!(view.is_loading());

        view.hide_loading();
        view.hide_loading();
        assert_eq!(view.metrics, MetricsPanel::Empty);
    }

    #[test]
    fn hide_loading_keeps_cards_and_errors() {
        let mut view = ViewState::new();
        view.show_metrics(vec![card()]);
        view.hide_loading();
        assert_eq!(view.metric_cards().len(), 1);

        view.show_error("boom");
        view.hide_loading();
        assert_eq!(view.error_message(), Some("boom"));
    }

    #[test]
    fn each_status_write_replaces_the_previous_one() {
        let mut view = ViewState::new();
        view.show_metrics(vec![card()]);
        view.show_loading();
        assert!(view.metric_cards().is_empty());

        view.show_error("first");
        view.show_error("second");
        assert_eq!(view.error_message(), Some("second"));
    }

    #[test]
    fn serializes_panel_status_tags() {
        let mut view = ViewState::new();
        view.show_error("Ticker XYZ not found.");
        let value = serde_json::to_value(&view).expect("serializes");

        assert_eq!(value["metrics"]["status"], "error");
        assert_eq!(value["metrics"]["content"], "Ticker XYZ not found.");
        assert_eq!(value["charts"]["candlestick"]["status"], "empty");
    }
}
