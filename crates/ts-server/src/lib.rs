//! Train Search Server Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! HTTP API over the locally stored railway timetables.
//!
//! # Routes
//!
//! - `GET /json/:date`: stored timetable for a `YYYYMMDD` service day
//! - `GET /force-download?file_date=`: re-download one day or everything
//! - `GET /items/:item_id?q=`: echo endpoint used by the front-end
//! - `GET /health`: liveness plus the number of stored timetables
//!
//! The server also runs the crawl scheduler so the folder stays current.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ts_server::{config::Config, create_router, AppState};
//! use ts_ingest::Crawler;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let crawler = Arc::new(Crawler::new(config.crawler.clone())?);
//!     let app = create_router(AppState::new(crawler), &config);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8899").await?;
//!     let shutdown = async { let _ = tokio::signal::ctrl_c().await; };
//!     ts_server::serve(listener, app, shutdown, config.shutdown_timeout()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod features;
pub mod middleware;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::compression::CompressionLayer;
use ts_ingest::{loader, Crawler};

use crate::api::AppError;
use crate::config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<Crawler>,
}

impl AppState {
    pub fn new(crawler: Arc<Crawler>) -> Self {
        Self { crawler }
    }
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state.clone())
        .merge(features::router(state))
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Serve `app` until `signal` resolves, then give in-flight requests up to
/// `drain_timeout` to finish before dropping them.
///
/// The listener stops accepting as soon as the signal fires.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    drain_timeout: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                let _ = signalled_tx.send(());
            })
            .await
    });

    tokio::select! {
        result = &mut server => return Ok(result??),
        _ = signalled_rx => {},
    }

    tracing::info!(
        timeout_secs = drain_timeout.as_secs_f64(),
        "Waiting for open connections to finish"
    );
    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(result) => Ok(result??),
        Err(_) => {
            tracing::warn!("Connections still open after drain timeout, closing them");
            server.abort();
            Ok(())
        },
    }
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let folder = state.crawler.config().db_folder.clone();
    let listed = {
        let folder = folder.clone();
        tokio::task::spawn_blocking(move || loader::json_files(&folder)).await
    };
    let stored = listed
        .map_err(|e| AppError::Internal(format!("Storage scan aborted: {}", e)))?
        .map_err(|e| {
            tracing::error!(folder = %folder.display(), error = %e, "Health check failed");
            AppError::Internal(format!("Storage folder unavailable: {}", e))
        })?;

    Ok(Json(json!({
        "status": "healthy",
        "stored_files": stored.len(),
    })))
}
