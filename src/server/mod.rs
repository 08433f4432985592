//! Mock analysis endpoint.
//!
//! Stands in for a real vision service during development: it accepts the
//! same `{ imageData, docType }` body the gallery posts, sleeps for a while,
//! and returns a fixed markdown analysis per doc type.

mod canned;
mod handlers;
mod routes;

pub use canned::{analysis_for, analysis_for_tag, FALLBACK_ANALYSIS};
pub use handlers::PROCESS_ERROR;
pub use routes::create_router;

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::error::GalleryError;

/// Shared state for the endpoint.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Simulated latency before each answer.
    pub analysis_delay_ms: u64,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            analysis_delay_ms: config.analysis_delay_ms,
        }
    }
}

async fn bind(config: &ServerConfig) -> Result<TcpListener, GalleryError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| GalleryError::Server(format!("Invalid bind address: {e}")))?;
    TcpListener::bind(addr)
        .await
        .map_err(|e| GalleryError::Server(format!("Failed to bind {addr}: {e}")))
}

/// Start the endpoint and serve until the process exits.
pub async fn serve(config: &ServerConfig) -> Result<(), GalleryError> {
    let listener = bind(config).await?;
    let app = create_router(AppState::new(config));

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Starting analysis endpoint at http://{}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| GalleryError::Server(e.to_string()))
}

/// Bind, then serve on a background task.
///
/// Returns the bound address (useful with port 0) and the task handle.
pub async fn spawn(
    config: &ServerConfig,
) -> Result<(SocketAddr, JoinHandle<Result<(), GalleryError>>), GalleryError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| GalleryError::Server(e.to_string()))?;
    let app = create_router(AppState::new(config));
    tracing::debug!("Analysis endpoint listening on {}", addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .map_err(|e| GalleryError::Server(e.to_string()))
    });
    Ok((addr, handle))
}
