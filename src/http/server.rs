//! HTTP server startup logic.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{AppConfig, ConfigError};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    Address(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind the configured address and serve until a shutdown signal arrives.
///
/// Returns `Ok(())` after a graceful shutdown. Bind failures (port in use,
/// permission denied) are returned immediately and never retried.
pub async fn start_server(app: Router, config: AppConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let port = listener.local_addr().map_err(ServerError::Serve)?.port();
    tracing::info!(%addr, port, "Tracker service listening");

    serve(listener, app, shutdown::shutdown_signal()).await
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
///
/// Each request runs as its own task; in-flight requests are drained once
/// `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let overrides = Overrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(port),
            ..Default::default()
        };
        let config = AppConfig::resolve(None, None, overrides).unwrap();

        let err = start_server(Router::new(), config).await.unwrap_err();
        match err {
            ServerError::Bind { addr, .. } => assert_eq!(addr.port(), port),
            other => panic!("expected bind error, got {other:?}"),
        }
    }
}
