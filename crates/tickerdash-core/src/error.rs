use thiserror::Error;

/// Input validation errors raised before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a ticker symbol")]
    EmptyTicker,

    #[error("invalid asset type '{value}', expected one of stock, etf, crypto")]
    InvalidAssetType { value: String },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

/// Failure of one dashboard update cycle. The display text is the banner shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "Ticker {ticker} not found. Please make sure to include the exchange suffix if needed \
(e.g., .HK for Hong Kong stocks, .T for Tokyo stocks)."
    )]
    TickerNotFound { ticker: String },

    #[error("{message}")]
    Fetch { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("failed to parse {context}: {message}")]
    Parse {
        context: &'static str,
        message: String,
    },
}

impl DashboardError {
    pub fn fetch(status: u16, message: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            message: message.into(),
        }
    }

    pub fn parse(context: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Parse {
            context,
            message: error.to_string(),
        }
    }

    /// HTTP status attached to the failure, when the server answered.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Chart payload could not be parsed or themed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("{chart} payload is not valid JSON: {message}")]
    InvalidJson { chart: &'static str, message: String },

    #[error("{chart} payload must be an object")]
    NotAnObject { chart: &'static str },

    #[error("{chart} data must be an array of traces")]
    DataNotArray { chart: &'static str },

    #[error("{chart} trace {index} must be an object")]
    TraceNotObject { chart: &'static str, index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_not_found_names_symbol_and_suffix_hint() {
        let message = DashboardError::TickerNotFound {
            ticker: String::from("7203"),
        }
        .to_string();

        assert!(message.starts_with("Ticker 7203 not found."));
        assert!(message.contains(".HK"));
        assert!(message.contains(".T for Tokyo"));
    }

    #[test]
    fn empty_ticker_message_is_user_facing() {
        let error = DashboardError::from(ValidationError::EmptyTicker);
        assert_eq!(error.to_string(), "Please enter a ticker symbol");
        assert_eq!(error.status(), None);
    }
}
