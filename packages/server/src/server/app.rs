//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    response::IntoResponse,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::common::ApiError;
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes;

/// Uniform bound on request handling; every downstream call is a network
/// call to an external collaborator.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// Every route sees the JWT middleware; handlers that need an identity
/// extract `AuthUser` and reject with 401 when none was attached. CORS is
/// open: the API is consumed directly by browser frontends.
pub fn build_app(deps: Arc<ServerDeps>) -> Router {
    let jwt_service_for_middleware = deps.jwt_service.clone();
    let state = AxumAppState { deps };

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .merge(routes::health::routes())
        .nest("/auth", routes::auth::routes())
        .nest("/organisations", routes::organisations::routes())
        .nest("/projects", routes::projects::routes())
        .nest("/proxy", routes::proxy::routes())
        .nest("/categories", routes::categories::routes())
        .fallback(not_found_handler)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(cors)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

/// Uniform 404 envelope for unknown routes
async fn not_found_handler() -> axum::response::Response {
    ApiError::NotFound("Route not found".into()).into_response()
}
