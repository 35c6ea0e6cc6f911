// HTTP surface for the roast envelope.

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use skidmark_core::{BatchCoordinator, TextGenerator};

use crate::config::ServerConfig;
use crate::handler::handle_roast_request;

/// Coordinator shared by every request.
pub type SharedCoordinator = BatchCoordinator<dyn TextGenerator>;

/// Build the service router: `POST /roasts` and `GET /health`.
pub fn router(coordinator: SharedCoordinator) -> Router {
    Router::new()
        .route("/roasts", post(roasts))
        .route("/health", get(health))
        .with_state(coordinator)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn roasts(State(coordinator): State<SharedCoordinator>, body: String) -> Response {
    let envelope = handle_roast_request(&body, &coordinator).await;
    let status =
        StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope.body)).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Bind `host:port` and serve until Ctrl+C.
pub async fn serve(config: &ServerConfig, app: Router) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler, keep serving until the process is killed.
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
