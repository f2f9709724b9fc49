//! Server execution logic.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, domain::ConnectionId, error::ServerError};

use super::{
    handler::{get_room_detail, get_rooms, get_users, handle_connection, health_check},
    signal::shutdown_signal,
    state::AppState,
};

/// Chat relay server
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig::default();
/// let server = Server::new(Arc::new(AppState::new(&config)));
/// server.run(&config).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    next_connection: AtomicU64,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            next_connection: AtomicU64::new(1),
        }
    }

    /// Bind the listeners from `config` and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be bound or the HTTP API fails.
    pub async fn run(self, config: &ServerConfig) -> Result<(), ServerError> {
        let listener = bind(&config.host, config.port).await?;
        let http_listener = match config.http_port {
            Some(port) => Some(bind(&config.host, port).await?),
            None => None,
        };

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        if let Some(http_listener) = &http_listener {
            tracing::info!("HTTP status API listening on {}", http_listener.local_addr()?);
        }
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, http_listener, shutdown_signal()).await
    }

    /// Accept connections on already-bound listeners until `shutdown` resolves
    pub async fn serve(
        self,
        listener: TcpListener,
        http_listener: Option<TcpListener>,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let http_task = http_listener.map(|http_listener| {
            let app = http_router(self.state.clone());
            let mut shutdown_rx = shutdown_rx.clone();
            tokio::spawn(async move {
                axum::serve(http_listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.changed().await;
                    })
                    .await
            })
        });

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        let connection =
                            ConnectionId::new(self.next_connection.fetch_add(1, Ordering::Relaxed));
                        tracing::info!("Accepted '{}' from {}", connection, peer_addr);
                        tokio::spawn(handle_connection(
                            stream,
                            peer_addr,
                            connection,
                            self.state.clone(),
                        ));
                    }
                    Err(e) => tracing::warn!("Failed to accept connection: {}", e),
                },
            }
        }

        let _ = shutdown_tx.send(true);
        if let Some(http_task) = http_task {
            match http_task.await {
                Ok(result) => result?,
                Err(e) => tracing::error!("HTTP status API task failed: {}", e),
            }
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn bind(host: &str, port: u16) -> Result<TcpListener, ServerError> {
    let addr = format!("{}:{}", host, port);
    TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

fn http_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{name}", get(get_room_detail))
        .route("/api/users", get(get_users))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
