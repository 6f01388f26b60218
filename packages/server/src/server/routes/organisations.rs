use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::common::{ApiError, ApiResponse, Validator};
use crate::domains::organisations::{
    create_organisation, organisations_for_user, Organisation, OrganisationInput,
    OrganisationWithRole,
};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

pub fn routes() -> Router {
    Router::new().route("/", post(create_handler).get(list_handler))
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganisationRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub siret: Option<String>,
    pub address: Option<String>,
}

async fn create_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
    Json(body): Json<CreateOrganisationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Organisation>>), ApiError> {
    let mut validator = Validator::new();
    validator.check(
        body.name.as_deref().is_some_and(|n| !n.is_empty()),
        "name is required",
    );
    validator.finish()?;

    let organisation = create_organisation(
        state.deps.store.as_ref(),
        &user.id,
        OrganisationInput {
            name: body.name.unwrap_or_default(),
            kind: body.kind,
            siret: body.siret,
            address: body.address,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(organisation))))
}

async fn list_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<OrganisationWithRole>>>, ApiError> {
    let organisations = organisations_for_user(state.deps.store.as_ref(), &user.id).await?;
    Ok(Json(ApiResponse::new(organisations)))
}
