//! Train Search Server - Main entry point

use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;
use ts_common::logging::{init_logging, LogConfig};
use ts_ingest::{CrawlSchedule, CrawlScheduler, Crawler};

use ts_server::{config::Config, create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("ts-server")
        .filter_directives("ts_server=debug,ts_ingest=info,tower_http=debug")
        .build()
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    info!("Starting Train Search server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    tokio::fs::create_dir_all(config.db_folder()).await?;
    info!(folder = %config.db_folder().display(), "Timetable storage ready");

    let crawler = Arc::new(Crawler::new(config.crawler.clone())?);

    let scheduler_handle = if config.scheduler.enabled {
        let handle = CrawlScheduler::new(crawler.clone(), CrawlSchedule::default()).start();
        info!("Crawl scheduler started");
        Some(handle)
    } else {
        info!("Crawl scheduler is disabled (TS_SCHEDULER_ENABLED=false)");
        None
    };

    let app = create_router(AppState::new(crawler), &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    ts_server::serve(listener, app, shutdown_signal(), config.shutdown_timeout()).await?;

    if let Some(handle) = scheduler_handle {
        handle.abort();
    }

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
