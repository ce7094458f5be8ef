//! # tickerdash core
//!
//! The request/render pipeline behind the tickerdash asset viewer.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Ticker check and data request against the dashboard server |
//! | [`chart`] | Theme merge for the candlestick and volume figures |
//! | [`dashboard`] | Update-cycle controller with stale-result fencing |
//! | [`domain`] | Ticker, asset type, date range, request types |
//! | [`error`] | Validation, dashboard and chart errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`metrics`] | Metric cards |
//! | [`view`] | Explicit view state of the page containers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickerdash_core::{AssetType, DashboardApi, DashboardController, FormInput};
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = DashboardController::new(DashboardApi::new("http://127.0.0.1:5000"));
//!     let form = FormInput::new("AAPL", AssetType::Stock, "2024-01-01", "2024-06-30");
//!
//!     let outcome = controller.update(&form).await;
//!     println!("{outcome:?}");
//!     for card in controller.snapshot().metric_cards() {
//!         println!("{}: {}", card.label, card.value);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   FormInput     │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Dashboard       │────▶│ DashboardApi     │──▶ HttpClient (reqwest)
//! │ Controller      │     └──────────────────┘
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ render_metrics  │     │ render_charts    │──▶ PlotSink
//! └────────┬────────┘     └────────┬─────────┘
//!          └──────────┬────────────┘
//!                     ▼
//!              ┌─────────────┐
//!              │  ViewState  │
//!              └─────────────┘
//! ```

pub mod api;
pub mod chart;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod metrics;
pub mod view;

pub use api::{DashboardApi, DataResponse};
pub use chart::{
    merge_json, render_charts, theme_figure, ChartKind, ChartPanel, ChartsView, PlotFigure,
    PlotSink, Theme, THEME,
};
pub use dashboard::{DashboardController, Stage, UpdateOutcome};
pub use domain::{
    clamp_date, format_iso_date, parse_iso_date, AssetType, DashboardRequest, DateRange,
    FormInput, Ticker, MAX_DATE, MIN_DATE,
};
pub use error::{ChartError, DashboardError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient,
};
pub use metrics::{render_metrics, MetricCard, MetricKind, MetricValue};
pub use view::{MetricsPanel, ViewState, METRICS_CONTAINER_ID};
