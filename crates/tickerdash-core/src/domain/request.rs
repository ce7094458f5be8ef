use serde::{Deserialize, Serialize};
use time::Date;

use super::date_range::{format_iso_date, DateRange};
use crate::{AssetType, Ticker, ValidationError};

/// Raw values of the analysis form, exactly as the user left them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub ticker: String,
    pub asset_type: AssetType,
    pub start_date: String,
    pub end_date: String,
}

impl FormInput {
    pub fn new(
        ticker: impl Into<String>,
        asset_type: AssetType,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            asset_type,
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Form as first shown: the last 30 days up to `today`.
    pub fn with_default_dates(ticker: impl Into<String>, asset_type: AssetType, today: Date) -> Self {
        let range = DateRange::trailing_days(today, 30);
        Self::new(
            ticker,
            asset_type,
            format_iso_date(range.start()),
            format_iso_date(range.end()),
        )
    }

    /// Rewrite both date fields with their validated values.
    ///
    /// Runs whenever either date changes and again right before submission.
    pub fn validate_dates(&mut self) -> DateRange {
        let range = DateRange::from_inputs(&self.start_date, &self.end_date);
        self.start_date = format_iso_date(range.start());
        self.end_date = format_iso_date(range.end());
        range
    }

    /// Validate the form into a request; only the ticker can fail.
    pub fn to_request(&self) -> Result<DashboardRequest, ValidationError> {
        let ticker = Ticker::parse(&self.ticker)?;
        let range = DateRange::from_inputs(&self.start_date, &self.end_date);
        Ok(DashboardRequest::new(ticker, self.asset_type, range))
    }
}

/// JSON body of `POST /get_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub ticker: Ticker,
    pub asset_type: AssetType,
    #[serde(flatten)]
    pub range: DateRange,
}

impl DashboardRequest {
    pub fn new(ticker: Ticker, asset_type: AssetType, range: DateRange) -> Self {
        Self {
            ticker,
            asset_type,
            range,
        }
    }
}
