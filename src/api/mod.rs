//! HTTP surface over [`crate::Catalog`].

pub mod error;
pub mod extract;
pub mod routes;

use crate::domain::error::DomainError;
use crate::Catalog;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use routes::router;

pub async fn serve(catalog: Arc<Catalog>, bind: &str) -> Result<(), DomainError> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| DomainError::Io(format!("failed to bind {bind}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| DomainError::Io(e.to_string()))?;
    info!(%addr, "API is ready to accept requests");
    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DomainError::Io(format!("server error: {e}")))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
