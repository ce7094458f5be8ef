use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tickerdash_core::{format_iso_date, parse_iso_date, AssetType, DateRange, MAX_DATE, MIN_DATE};
use time::Date;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::analytics::{compute_metrics, describe};
use crate::error::ServerError;
use crate::figures::{candlestick_figure, volume_figure};
use crate::store::BarStore;

const DEFAULT_TICKER: &str = "AAPL";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BarStore>,
}

impl AppState {
    pub fn new(store: BarStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get_tickers/:asset_type", get(get_tickers))
        .route("/get_data", post(get_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_tickers(
    State(state): State<AppState>,
    Path(asset_type): Path<String>,
) -> Json<Vec<String>> {
    let tickers = match table_for(&asset_type) {
        Some(asset_type) => state.store.tickers(asset_type),
        None => {
            warn!(%asset_type, "ticker list requested for unknown asset type");
            Vec::new()
        }
    };
    info!(%asset_type, count = tickers.len(), "ticker list");
    Json(tickers)
}

#[derive(Debug, Deserialize)]
struct DataQuery {
    ticker: Option<String>,
    asset_type: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Body of a successful `/get_data` answer. Figures travel as JSON text.
#[derive(Debug, Serialize)]
pub struct DataPayload {
    pub metrics: Map<String, Value>,
    pub candlestick_chart: String,
    pub volume_chart: String,
    pub stats: Value,
}

async fn get_data(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DataPayload>, ServerError> {
    let query = parse_query(&body)?;

    let ticker = query
        .ticker
        .as_deref()
        .unwrap_or(DEFAULT_TICKER)
        .to_uppercase();
    let asset_type = query.asset_type.as_deref().unwrap_or("stock");
    let start_text = query.start_date.as_deref().unwrap_or_default();
    let end_text = query.end_date.as_deref().unwrap_or_default();
    let range = strict_range(start_text, end_text)?;

    info!(%ticker, %asset_type, %range, "fetching bars");

    let bars = table_for(asset_type)
        .map(|asset_type| state.store.bars(asset_type, &ticker, range))
        .unwrap_or_default();
    if bars.is_empty() {
        warn!(%ticker, %range, "no bars in range");
        return Err(ServerError::NotFound(format!(
            "No data found for {ticker} between {start_text} and {end_text}"
        )));
    }

    let candlestick_chart = serde_json::to_string(&candlestick_figure(&bars))
        .map_err(|e| ServerError::Internal(format!("serializing candlestick chart: {e}")))?;
    let volume_chart = serde_json::to_string(&volume_figure(&bars))
        .map_err(|e| ServerError::Internal(format!("serializing volume chart: {e}")))?;

    info!(%ticker, rows = bars.len(), "serving bars");
    Ok(Json(DataPayload {
        metrics: compute_metrics(&bars),
        candlestick_chart,
        volume_chart,
        stats: describe(&bars),
    }))
}

/// Exact, case-sensitive table lookup; `STOCK` names no table.
fn table_for(name: &str) -> Option<AssetType> {
    AssetType::ALL
        .into_iter()
        .find(|asset_type| asset_type.as_str() == name)
}

/// An absent, malformed or empty body all count as no data.
fn parse_query(body: &[u8]) -> Result<DataQuery, ServerError> {
    let no_data = || ServerError::BadRequest(String::from("No data provided"));

    let value: Value = serde_json::from_slice(body).map_err(|_| no_data())?;
    match &value {
        Value::Object(fields) if !fields.is_empty() => {}
        _ => return Err(no_data()),
    }
    serde_json::from_value(value)
        .map_err(|e| ServerError::BadRequest(format!("Invalid request body: {e}")))
}

fn strict_range(start: &str, end: &str) -> Result<DateRange, ServerError> {
    let start = strict_date(start)?;
    let end = strict_date(end)?;

    if start < MIN_DATE {
        return Err(ServerError::BadRequest(format!(
            "Start date cannot be before {}",
            format_iso_date(MIN_DATE)
        )));
    }
    if end > MAX_DATE {
        return Err(ServerError::BadRequest(format!(
            "End date cannot be after {}",
            format_iso_date(MAX_DATE)
        )));
    }
    if start > end {
        return Err(ServerError::BadRequest(String::from(
            "Start date cannot be after end date",
        )));
    }
    Ok(DateRange::clamp(start, end))
}

fn strict_date(text: &str) -> Result<Date, ServerError> {
    parse_iso_date(text)
        .map_err(|e| ServerError::BadRequest(format!("Invalid date format: {e}")))
}
