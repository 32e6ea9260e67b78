//! Sidecar HTTP server: liveness/readiness probes and the scrape endpoint.

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::registry::RelayMetrics;

/// Build the sidecar router.
pub fn router(metrics: RelayMetrics) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/readyz", get(health))
        .route("/metrics", get(scrape))
        .with_state(metrics)
}

/// Serve probes and metrics until the process exits.
pub async fn serve(addr: SocketAddr, metrics: RelayMetrics) -> Result<()> {
    let app = router(metrics);

    info!("Metrics server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Liveness and readiness are the same here: the process is up.
async fn health() -> &'static str {
    "OK"
}

async fn scrape(State(metrics): State<RelayMetrics>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
