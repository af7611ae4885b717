use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bigo_client::api::AnalyzerApi;
use bigo_web::config::{ConfigError, ServerConfig};
use bigo_web::router::build_app_router;
use bigo_web::state::AppState;

const BACKEND_HEALTH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid HOST address: {0}")]
    Host(#[from] AddrParseError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bigo_web=debug,bigo_client=debug,bigo_report=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = %config.port,
        analyzer = %config.analyzer_base_url,
        "Loaded server configuration"
    );

    let host: IpAddr = config.host.parse()?;
    let addr = SocketAddr::new(host, config.port);

    // --- Analysis backend ---
    let api = AnalyzerApi::new(config.analyzer_base_url.clone(), config.analyzer_timeout());
    let state = AppState::new(config.clone(), Arc::new(api));
    if state.refresh_backend_status().await {
        tracing::info!("Analysis backend is reachable");
    } else {
        tracing::warn!("Analysis backend is not reachable; serving anyway");
    }
    let health_handle = tokio::spawn(refresh_backend_status(state.clone()));

    let shutdown = state.shutdown.clone();
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    // --- Post-shutdown cleanup ---
    let _ = tokio::time::timeout(Duration::from_secs(5), health_handle).await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Re-check backend health periodically so the page header follows outages
/// without blocking page requests on a health call.
async fn refresh_backend_status(state: AppState) {
    let mut interval = tokio::time::interval(BACKEND_HEALTH_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; startup already checked.
    interval.tick().await;

    loop {
        tokio::select! {
            () = state.shutdown.cancelled() => break,
            _ = interval.tick() => {
                state.refresh_backend_status().await;
            }
        }
    }
    tracing::debug!("Backend status refresh stopped");
}

/// Wait for SIGINT or SIGTERM, then cancel in-flight analyses so open
/// connections can drain.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    shutdown.cancel();
}
