use axum::{Json, Router};
use axum::routing::get;
use serde::Serialize;

pub fn routes() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

#[derive(Serialize)]
pub struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    status: &'static str,
}

/// Service banner at the root path
async fn root_handler() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Génie Public API",
        version: env!("CARGO_PKG_VERSION"),
        status: "online",
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Liveness probe. Durable state is an external collaborator, so there is
/// nothing local to check beyond the process answering.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
