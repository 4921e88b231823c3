//! Fluxflix catalog HTTP server.
//!
//! Serves the movie catalog and per-movie event streams behind Basic auth.

use axum::Router;
use fluxflix_auth::{AuthorizationEngine, UserDirectory};
use fluxflix_core::environment::SystemClock;
use fluxflix_runtime::metrics::MetricsServer;
use fluxflix_runtime::{CatalogService, EventStreamGenerator};
use fluxflix_server::{Config, ops_router, seed_movies};
use fluxflix_testing::InMemoryMovieRepository;
use fluxflix_web::{AppState, router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fluxflix=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Fluxflix catalog server");

    let config = Config::from_env();
    info!(
        address = %config.server_addr(),
        ops_address = %config.metrics_addr(),
        interval_ms = config.stream.interval_ms,
        seed = config.seed_movies,
        "Configuration loaded"
    );

    let repository = Arc::new(InMemoryMovieRepository::new());
    if config.seed_movies {
        let seeded = seed_movies(repository.as_ref()).await?;
        info!(count = seeded.len(), "Catalog seeded");
    }

    let generator = EventStreamGenerator::new(config.stream_interval(), Arc::new(SystemClock));
    let state = AppState::new(
        CatalogService::new(repository, generator),
        AuthorizationEngine::default(),
        UserDirectory::demo(),
    );

    let ops_listener = TcpListener::bind(config.metrics_addr()).await?;
    let mut metrics = MetricsServer::new(ops_listener.local_addr()?);
    metrics.start()?;
    info!(address = %metrics.addr(), "Ops server listening");

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!(address = %listener.local_addr()?, "Server listening");

    let shutdown = CancellationToken::new();
    let api = tokio::spawn(serve(listener, router(state), shutdown.clone()));
    let ops = tokio::spawn(serve(
        ops_listener,
        ops_router(Arc::new(metrics)),
        shutdown.clone(),
    ));

    shutdown_signal().await;
    shutdown.cancel();

    // Event streams never finish on their own; whatever is still open when
    // the grace period ends is dropped with the runtime.
    let drained = tokio::time::timeout(config.shutdown_timeout(), async {
        let (api, ops) = tokio::join!(api, ops);
        for result in [api, ops] {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Listener failed"),
                Err(e) => error!(error = %e, "Listener task panicked"),
            }
        }
    })
    .await;

    if drained.is_err() {
        warn!(
            timeout_secs = config.server.shutdown_timeout,
            "Shutdown timeout elapsed, closing open connections"
        );
    }

    info!("Server stopped");
    Ok(())
}

async fn serve(listener: TcpListener, app: Router, shutdown: CancellationToken) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
