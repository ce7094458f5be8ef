//! One dashboard update cycle as a linear async pipeline.
//!
//! ```text
//! validate form ──▶ ticker check ──▶ data fetch ──▶ render metrics + charts
//!       │                │               │
//!       └────────────────┴───────────────┴──▶ error banner
//! ```
//!
//! Overlapping cycles are not cancelled. Each one takes the next request id
//! and only writes its result while that id is still the latest issued;
//! anything older is dropped as [`UpdateOutcome::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{DashboardApi, DataResponse};
use crate::chart::render_charts;
use crate::metrics::render_metrics;
use crate::view::ViewState;
use crate::{DashboardError, DashboardRequest, FormInput};

/// Pipeline stage a cycle stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validate,
    TickerCheck,
    DataFetch,
}

/// Result of one update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    Rendered {
        request_id: u64,
        metric_cards: usize,
        charts_plotted: bool,
    },
    Failed {
        request_id: u64,
        stage: Stage,
        message: String,
    },
    /// A newer cycle started before this one finished; its result was discarded.
    Superseded { request_id: u64 },
}

impl UpdateOutcome {
    pub const fn request_id(&self) -> u64 {
        match self {
            Self::Rendered { request_id, .. }
            | Self::Failed { request_id, .. }
            | Self::Superseded { request_id } => *request_id,
        }
    }

    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

pub struct DashboardController {
    api: DashboardApi,
    view: Arc<Mutex<ViewState>>,
    latest_request: AtomicU64,
}

impl DashboardController {
    pub fn new(api: DashboardApi) -> Self {
        Self {
            api,
            view: Arc::new(Mutex::new(ViewState::new())),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &DashboardApi {
        &self.api
    }

    /// Shared handle to the live view state.
    pub fn view(&self) -> Arc<Mutex<ViewState>> {
        Arc::clone(&self.view)
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock_view().clone()
    }

    /// Run one update cycle for `form`.
    pub async fn update(&self, form: &FormInput) -> UpdateOutcome {
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            request_id,
            ticker = %form.ticker,
            asset_type = %form.asset_type,
            start_date = %form.start_date,
            end_date = %form.end_date,
            "starting dashboard update"
        );

        let request = match form.to_request() {
            Ok(request) => request,
            Err(error) => {
                return self.fail(request_id, Stage::Validate, &DashboardError::from(error));
            }
        };

        if !self.write_if_current(request_id, ViewState::show_loading) {
            return UpdateOutcome::Superseded { request_id };
        }

        match self.run_stages(&request).await {
            Ok(response) => self.render(request_id, &response),
            Err((stage, error)) => self.fail(request_id, stage, &error),
        }
    }

    async fn run_stages(
        &self,
        request: &DashboardRequest,
    ) -> Result<DataResponse, (Stage, DashboardError)> {
        self.api
            .check_ticker(&request.ticker, request.asset_type)
            .await
            .map_err(|error| (Stage::TickerCheck, error))?;

        debug!(ticker = %request.ticker, range = %request.range, "sending data request");
        self.api
            .fetch_data(request)
            .await
            .map_err(|error| (Stage::DataFetch, error))
    }

    fn render(&self, request_id: u64, response: &DataResponse) -> UpdateOutcome {
        let cards = response.metrics.as_ref().map(render_metrics);
        let charts = render_charts(
            response.candlestick_chart.as_ref(),
            response.volume_chart.as_ref(),
        );
        let metric_cards = cards.as_ref().map_or(0, Vec::len);
        let charts_plotted = charts.candlestick.figure().is_some();

        let written = self.write_if_current(request_id, |view| {
            if let Some(cards) = cards {
                view.show_metrics(cards);
            }
            view.show_charts(charts);
            view.hide_loading();
        });

        if !written {
            return UpdateOutcome::Superseded { request_id };
        }

        info!(request_id, metric_cards, charts_plotted, "dashboard updated");
        UpdateOutcome::Rendered {
            request_id,
            metric_cards,
            charts_plotted,
        }
    }

    fn fail(&self, request_id: u64, stage: Stage, error: &DashboardError) -> UpdateOutcome {
        let message = error.to_string();
        warn!(request_id, ?stage, error = %message, "dashboard update failed");

        let written = self.write_if_current(request_id, |view| {
            view.show_error(message.clone());
            view.hide_loading();
        });

        if written {
            UpdateOutcome::Failed {
                request_id,
                stage,
                message,
            }
        } else {
            UpdateOutcome::Superseded { request_id }
        }
    }

    /// Apply `write` only if `request_id` is the latest issued cycle.
    fn write_if_current(&self, request_id: u64, write: impl FnOnce(&mut ViewState)) -> bool {
        let mut view = self.lock_view();
        if self.latest_request.load(Ordering::SeqCst) != request_id {
            debug!(request_id, "discarding stale dashboard result");
            return false;
        }

        write(&mut view);
        view.request_id = Some(request_id);
        true
    }

    fn lock_view(&self) -> MutexGuard<'_, ViewState> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::chart::{ChartPanel, THEME};
    use crate::http_client::{
        HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ScriptedHttpClient,
    };
    use crate::view::MetricsPanel;
    use crate::AssetType;

    const BASE: &str = "http://dash.test";

    fn data_body() -> String {
        json!({
            "metrics": {
                "Latest Price": "$189.98",
                "Average Volume": {"nested": 1},
            },
            "candlestick_chart": json!({
                "data": [{"type": "candlestick", "open": [1.0], "close": [2.0]}],
                "layout": {},
            }).to_string(),
            "volume_chart": {"data": [{"type": "bar", "y": [10]}], "layout": {}},
        })
        .to_string()
    }

    fn controller(client: &Arc<ScriptedHttpClient>) -> DashboardController {
        DashboardController::new(DashboardApi::with_http_client(BASE, client.clone()))
    }

    #[tokio::test]
    async fn empty_ticker_shows_error_without_network_call() {
        let client = Arc::new(ScriptedHttpClient::new());
        let controller = controller(&client);

        let form = FormInput::new("  ", AssetType::Stock, "2021-01-01", "2021-02-01");
        let outcome = controller.update(&form).await;

        assert_eq!(
            outcome,
            UpdateOutcome::Failed {
                request_id: 1,
                stage: Stage::Validate,
                message: String::from("Please enter a ticker symbol"),
            }
        );
        assert!(client.recorded_requests().is_empty());
        assert_eq!(
            controller.snapshot().error_message(),
            Some("Please enter a ticker symbol")
        );
    }

    #[tokio::test]
    async fn unknown_ticker_stops_before_data_request() {
        let client = Arc::new(ScriptedHttpClient::new().respond(
            HttpMethod::Get,
            "/get_tickers/stock",
            HttpResponse::ok_json(r#"["MSFT"]"#),
        ));
        let controller = controller(&client);

        let form = FormInput::new("aapl", AssetType::Stock, "2021-01-01", "2021-02-01");
        let outcome = controller.update(&form).await;

        assert!(matches!(
            outcome,
            UpdateOutcome::Failed {
                stage: Stage::TickerCheck,
                ..
            }
        ));
        let view = controller.snapshot();
        let message = view.error_message().expect("error banner");
        assert!(message.contains("AAPL"));
        assert!(message.contains(".HK"));
        assert!(!view.is_loading());

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn successful_cycle_renders_cards_and_themed_charts() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .respond(
                    HttpMethod::Get,
                    "/get_tickers/stock",
                    HttpResponse::ok_json(r#"["AAPL"]"#),
                )
                .respond(HttpMethod::Post, "/get_data", HttpResponse::ok_json(data_body())),
        );
        let controller = controller(&client);

        let form = FormInput::new("AAPL", AssetType::Stock, "2019-01-01", "2021-02-01");
        let outcome = controller.update(&form).await;

        assert_eq!(
            outcome,
            UpdateOutcome::Rendered {
                request_id: 1,
                metric_cards: 1,
                charts_plotted: true,
            }
        );

        let view = controller.snapshot();
        assert_eq!(view.request_id, Some(1));
        assert_eq!(view.metric_cards()[0].label, "Latest Price");
        let candlestick = view.charts.candlestick.figure().expect("plotted");
        assert_eq!(
            candlestick.data[0]["increasing"]["line"]["color"],
            THEME.olive_green
        );

        let body: serde_json::Value = serde_json::from_str(
            client.recorded_requests()[1]
                .body
                .as_deref()
                .expect("post body"),
        )
        .expect("json");
        assert_eq!(body["start_date"], "2020-01-01");
    }

    #[tokio::test]
    async fn missing_metrics_clears_loading_and_keeps_chart_warnings() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .respond(
                    HttpMethod::Get,
                    "/get_tickers/crypto",
                    HttpResponse::ok_json(r#"["BTC-USD"]"#),
                )
                .respond(
                    HttpMethod::Post,
                    "/get_data",
                    HttpResponse::ok_json(r#"{"candlestick_chart":null}"#),
                ),
        );
        let controller = controller(&client);

        let form = FormInput::new("btc-usd", AssetType::Crypto, "2022-01-01", "2022-03-01");
        controller.update(&form).await;

        let view = controller.snapshot();
        assert_eq!(view.metrics, MetricsPanel::Empty);
        assert_eq!(
            view.charts.candlestick,
            ChartPanel::Warning(String::from("No chart data available"))
        );
        assert_eq!(
            view.charts.volume,
            ChartPanel::Warning(String::from("No volume data available"))
        );
    }

    #[tokio::test]
    async fn server_error_message_becomes_banner() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .respond(
                    HttpMethod::Get,
                    "/get_tickers/etf",
                    HttpResponse::ok_json(r#"["SPY"]"#),
                )
                .respond(
                    HttpMethod::Post,
                    "/get_data",
                    HttpResponse::new(404, r#"{"error":"No data found for SPY"}"#),
                ),
        );
        let controller = controller(&client);

        let form = FormInput::new("spy", AssetType::Etf, "2022-01-01", "2022-03-01");
        let outcome = controller.update(&form).await;

        assert!(matches!(
            outcome,
            UpdateOutcome::Failed {
                stage: Stage::DataFetch,
                ..
            }
        ));
        assert_eq!(
            controller.snapshot().error_message(),
            Some("No data found for SPY")
        );
    }

    /// Holds the AAPL data response until released.
    struct GatedHttpClient {
        gate: Arc<Notify>,
    }

    impl HttpClient for GatedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            Box::pin(async move {
                if request.url.contains("/get_tickers/") {
                    return Ok(HttpResponse::ok_json(r#"["AAPL","MSFT"]"#));
                }

                let body = request.body.unwrap_or_default();
                if body.contains("AAPL") {
                    self.gate.notified().await;
                }
                let ticker = if body.contains("AAPL") { "AAPL" } else { "MSFT" };
                Ok(HttpResponse::ok_json(
                    json!({ "metrics": { "Latest Price": ticker } }).to_string(),
                ))
            })
        }
    }

    #[tokio::test]
    async fn stale_cycle_result_is_discarded() {
        let gate = Arc::new(Notify::new());
        let client = Arc::new(GatedHttpClient {
            gate: Arc::clone(&gate),
        });
        let controller = DashboardController::new(DashboardApi::with_http_client(BASE, client));

        let slow = FormInput::new("AAPL", AssetType::Stock, "2021-01-01", "2021-02-01");
        let fast = FormInput::new("MSFT", AssetType::Stock, "2021-01-01", "2021-02-01");

        let first = controller.update(&slow);
        let second = async {
            let outcome = controller.update(&fast).await;
            gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, UpdateOutcome::Superseded { request_id: 1 });
        assert!(matches!(second, UpdateOutcome::Rendered { request_id: 2, .. }));

        let view = controller.snapshot();
        assert_eq!(view.request_id, Some(2));
        assert_eq!(view.metric_cards()[0].value, "MSFT");
    }
}
