use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request failures, answered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Detail is logged; the client only sees a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal(detail) => {
                error!(%detail, "error processing request");
                String::from("Internal server error")
            }
            other => other.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

/// Failures while loading bar files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
