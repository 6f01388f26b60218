use axum::extract::Extension;
use axum::routing::get;
use axum::{Json, Router};

use crate::common::{ApiError, ApiResponse};
use crate::domains::categories::{list_category_groups, CategoryGroup};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

pub fn routes() -> Router {
    Router::new().route("/aides-territoire", get(list_handler))
}

async fn list_handler(
    Extension(state): Extension<AxumAppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<CategoryGroup>>>, ApiError> {
    let groups = list_category_groups(state.deps.store.as_ref()).await?;
    Ok(Json(ApiResponse::new(groups)))
}
