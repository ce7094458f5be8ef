//! Client for the two dashboard endpoints.
//!
//! | Call | Endpoint | Result |
//! |------|----------|--------|
//! | [`DashboardApi::ticker_list`] | `GET /get_tickers/{asset_type}` | `Vec<String>` |
//! | [`DashboardApi::check_ticker`] | `GET /get_tickers/{asset_type}` | membership check |
//! | [`DashboardApi::fetch_data`] | `POST /get_data` | [`DataResponse`] |
//!
//! Neither call is retried.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{AssetType, DashboardError, DashboardRequest, Ticker};

/// Successful body of `POST /get_data`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    #[serde(default)]
    pub metrics: Option<Value>,
    /// Plot configuration, possibly JSON-encoded as a string.
    #[serde(default)]
    pub candlestick_chart: Option<Value>,
    /// Plot configuration, possibly JSON-encoded as a string.
    #[serde(default)]
    pub volume_chart: Option<Value>,
    /// Descriptive statistics; carried through, never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct DashboardApi {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: Option<u64>,
}

impl DashboardApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(base_url: impl Into<String>, http_client: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            http_client,
            timeout_ms: None,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every ticker the server knows for `asset_type`.
    pub async fn ticker_list(&self, asset_type: AssetType) -> Result<Vec<String>, DashboardError> {
        let url = format!(
            "{}/get_tickers/{}",
            self.base_url,
            urlencoding::encode(asset_type.as_str())
        );
        let response = self
            .send(HttpRequest::get(url).with_header("Accept", "application/json"))
            .await?;
        debug!(status = response.status, "ticker check response");

        if !response.is_success() {
            return Err(DashboardError::fetch(
                response.status,
                format!("Failed to fetch tickers ({})", response.status),
            ));
        }

        serde_json::from_str(&response.body).map_err(|e| DashboardError::parse("ticker list", e))
    }

    /// Succeeds only when `ticker` appears in the server list for `asset_type`.
    pub async fn check_ticker(
        &self,
        ticker: &Ticker,
        asset_type: AssetType,
    ) -> Result<(), DashboardError> {
        let tickers = self.ticker_list(asset_type).await?;
        debug!(count = tickers.len(), "available tickers");

        if tickers.iter().any(|known| known == ticker.as_str()) {
            Ok(())
        } else {
            Err(DashboardError::TickerNotFound {
                ticker: ticker.to_string(),
            })
        }
    }

    /// Issue the data request. A failed status surfaces the server's `error` field when present.
    pub async fn fetch_data(
        &self,
        request: &DashboardRequest,
    ) -> Result<DataResponse, DashboardError> {
        let body =
            serde_json::to_string(request).map_err(|e| DashboardError::parse("request body", e))?;
        let url = format!("{}/get_data", self.base_url);
        let response = self.send(HttpRequest::post_json(url, body)).await?;
        debug!(status = response.status, "data response status");

        if !response.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("Failed to fetch data ({})", response.status));
            return Err(DashboardError::fetch(response.status, message));
        }

        serde_json::from_str(&response.body).map_err(|e| DashboardError::parse("data response", e))
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, DashboardError> {
        self.http_client
            .execute(request.with_timeout_ms(self.timeout_ms))
            .await
            .map_err(|e| DashboardError::Transport(e.message().to_owned()))
    }
}
