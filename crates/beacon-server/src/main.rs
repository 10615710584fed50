//! Beacon HTTP server.
//!
//! - `GET /`        greeting
//! - `GET /health`  liveness
//! - `GET /metrics` Prometheus text format

use beacon_core::error::{BeaconError, Result};

use beacon_server::{app_state, config, router, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let cfg = config::load()?;
    let listen = cfg.server.listen_addr()?;

    // Metric registration happens here; a bad metric set never serves traffic.
    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "beacon-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| BeaconError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BeaconError::Internal(format!("server failed: {e}")))?;

    tracing::info!("beacon-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
