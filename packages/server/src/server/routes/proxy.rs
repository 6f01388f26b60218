//! Reverse proxy for the grants directory.
//!
//! Browser clients cannot call the directory themselves (CORS, and the API
//! key must stay server-side). These handlers translate query parameters
//! to the directory's dialect and relay the response as-is; the only gate
//! is authentication.

use axum::extract::{Extension, Path, Query};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::common::{ApiError, ApiResponse};
use crate::kernel::{GrantsDirectory, GrantsError};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

pub fn routes() -> Router {
    Router::new()
        .route("/aides-territoires/token", post(token_handler))
        .route("/aides-territoires/aids", get(search_handler))
        .route("/aides-territoires/backers/:id", get(backer_handler))
}

fn relay_error(context: &str, err: GrantsError) -> ApiError {
    ApiError::Relay {
        status: err.upstream_status().unwrap_or(500),
        error: context.to_string(),
        details: Some(err.to_string()),
    }
}

/// Translate client-side query parameters into the directory's dialect:
/// `itemsPerPage` becomes `limit`, `category_ids` may arrive
/// comma-separated and is repeated, `perimeter_codes` is repeated with the
/// `[]` suffix the directory expects. Everything else passes through.
fn translate_search_params(params: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut translated = Vec::with_capacity(params.len());

    for (key, value) in params {
        match key.as_str() {
            "itemsPerPage" => translated.push(("limit".to_string(), value)),
            "category_ids" => {
                for id in value.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                    translated.push(("category_ids".to_string(), id.to_string()));
                }
            }
            "perimeter_codes" => {
                for code in value.split(',').map(str::trim).filter(|c| !c.is_empty()) {
                    translated.push(("perimeter_codes[]".to_string(), code.to_string()));
                }
            }
            _ => translated.push((key, value)),
        }
    }

    translated
}

async fn token_handler(
    Extension(state): Extension<AxumAppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let token = state
        .deps
        .grants
        .token()
        .await
        .map_err(|e| relay_error("Grants directory authentication failed", e))?;

    Ok(Json(ApiResponse::new(token)))
}

async fn search_handler(
    Extension(state): Extension<AxumAppState>,
    _user: AuthUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let params = translate_search_params(params);

    let results = state
        .deps
        .grants
        .search_aids(&params)
        .await
        .map_err(|e| relay_error("Grants directory search failed", e))?;

    Ok(Json(ApiResponse::new(results)))
}

async fn backer_handler(
    Extension(state): Extension<AxumAppState>,
    _user: AuthUser,
    Path(backer_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let backer = state
        .deps
        .grants
        .backer(&backer_id)
        .await
        .map_err(|e| relay_error("Grants directory backer lookup failed", e))?;

    Ok(Json(ApiResponse::new(backer)))
}
