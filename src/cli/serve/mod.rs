//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::create_router_with_state;
use crate::config::AppConfig;

/// Run the API server until Ctrl+C or SIGTERM
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let state = crate::create_app_state_with_config(&config).await?;
    let app = create_router_with_state(state);

    let addr = build_socket_addr(&config)?;
    info!(%addr, "Starting API server");

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server shutdown complete");
    Ok(())
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_socket_addr() {
        let config = AppConfig::default();
        let addr = build_socket_addr(&config).unwrap();

        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn test_build_socket_addr_rejects_hostname() {
        let mut config = AppConfig::default();
        config.server.host = "not an ip".to_string();

        assert!(build_socket_addr(&config).is_err());
    }
}
