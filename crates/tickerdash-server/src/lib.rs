//! # tickerdash server
//!
//! Reference implementation of the two endpoints the dashboard consumes:
//!
//! - `GET /get_tickers/{asset_type}` lists the tickers with stored bars.
//! - `POST /get_data` returns metrics, stats and both chart figures for one
//!   ticker over a strictly validated date window.
//!
//! Bars are read once at startup from `{asset_type}.csv` files.

pub mod analytics;
pub mod error;
pub mod figures;
pub mod routes;
pub mod store;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

pub use error::{ServerError, StoreError};
pub use routes::{router, AppState, DataPayload};
pub use store::{Bar, BarStore};

/// Bind `addr` and serve `store` until the process is stopped.
pub async fn serve(store: BarStore, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, AppState::new(store)).await
}

/// Serve on an already bound listener.
pub async fn serve_on(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "server listening");
    axum::serve(listener, router(state)).await
}
