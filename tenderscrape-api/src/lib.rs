//! # Tenderscrape API
//!
//! Read-only HTTP access to the tenders database written by the scraper.
//!
//! - `GET /tenders?limit=10&offset=0` lists stored tenders in row order
//! - `GET /health` answers `ok`
//!
//! Errors come back as `{"detail": "..."}`.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use tenderscrape::errors::ScrapeError;
use tenderscrape::sink::{StoredTender, TenderStore};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    /// Serves tenders from the database at `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }
}

/// Paging parameters for `GET /tenders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    /// Maximum number of rows.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Rows to skip.
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    10
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Error returned by the handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request parameters.
    BadRequest(String),
    /// The store could not answer.
    Store(ScrapeError),
}

impl From<ScrapeError> for ApiError {
    fn from(error: ScrapeError) -> Self {
        Self::Store(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::Store(e) => {
                error!(error = %e, "Tender query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

/// `GET /tenders`: one page of stored tenders.
pub async fn list_tenders(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<StoredTender>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    debug!(limit = params.limit, offset = params.offset, "Listing tenders");

    let store = TenderStore::open_existing(&state.db_path).await?;
    let rows = store.list_tenders(params.limit, params.offset).await;
    store.close().await;

    Ok(Json(rows?))
}

/// `GET /health`.
pub async fn health() -> &'static str {
    "ok"
}

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tenders", get(list_tenders))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!(db = %state.db_path.display(), "Tender API listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("Tender API stopped");
    Ok(())
}
