//! Minimal liveness surface: `GET /health` → `200 ok`.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tracing::{error, info};

/// Bind the liveness listener and serve it on a background task.
/// Returns once the socket is bound; a bind failure is a startup error.
pub async fn spawn(port: u16) -> Result<()> {
    let app = Router::new().route("/health", get(|| async { "ok" }));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind health listener on port {port}"))?;

    info!(port, "Health listener started");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Health listener exited");
        }
    });

    Ok(())
}
