//! Project surface: CRUD, aide associations, and extraction-backed
//! creation from free text.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::common::{ApiError, ApiResponse, Validator};
use crate::domains::projects::{
    associate_aide, create_project, create_project_from_invite, get_project, list_project_aides,
    list_projects, update_project, AideWithAssociation, AssociateAideInput, CreateProjectInput,
    ExtractedProject, ProjectAide, ProjectWithOrganisation, UpdateProjectInput,
};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

pub fn routes() -> Router {
    Router::new()
        .route("/", post(create_handler).get(list_handler))
        .route("/from-invite", post(from_invite_handler))
        .route("/:id", get(get_handler).patch(update_handler))
        .route("/:id/aides", get(list_aides_handler).post(associate_aide_handler))
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub organisation_id: Option<String>,
}

async fn create_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectWithOrganisation>>), ApiError> {
    let mut validator = Validator::new();
    validator.check(
        body.title.as_deref().is_some_and(|t| !t.is_empty()),
        "title is required",
    );
    validator.check(
        body.organisation_id.as_deref().is_some_and(|o| !o.is_empty()),
        "organisation_id is required",
    );
    validator.finish()?;

    let project = create_project(
        state.deps.store.as_ref(),
        &user.id,
        CreateProjectInput {
            title: body.title.unwrap_or_default(),
            summary: body.summary,
            description: body.description,
            organisation_id: body.organisation_id.unwrap_or_default(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(project))))
}

async fn list_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<ProjectWithOrganisation>>>, ApiError> {
    let projects = list_projects(state.deps.store.as_ref(), &user.id).await?;
    Ok(Json(ApiResponse::new(projects)))
}

async fn get_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<ApiResponse<ProjectWithOrganisation>>, ApiError> {
    let project = get_project(state.deps.store.as_ref(), &user.id, &project_id).await?;
    Ok(Json(ApiResponse::new(project)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

async fn update_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(body): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectWithOrganisation>>, ApiError> {
    let project = update_project(
        state.deps.store.as_ref(),
        &user.id,
        &project_id,
        UpdateProjectInput {
            title: body.title,
            summary: body.summary,
            description: body.description,
        },
    )
    .await?;

    Ok(Json(ApiResponse::new(project)))
}

async fn list_aides_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AideWithAssociation>>>, ApiError> {
    let aides = list_project_aides(state.deps.store.as_ref(), &user.id, &project_id).await?;
    Ok(Json(ApiResponse::new(aides)))
}

#[derive(Debug, Deserialize)]
pub struct AssociateAideRequest {
    pub aide_id: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

async fn associate_aide_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(body): Json<AssociateAideRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectAide>>), ApiError> {
    let mut validator = Validator::new();
    validator.check(
        body.aide_id.as_deref().is_some_and(|a| !a.is_empty()),
        "aide_id is required",
    );
    validator.finish()?;

    let (created, association) = associate_aide(
        state.deps.store.as_ref(),
        &user.id,
        &project_id,
        AssociateAideInput {
            aide_id: body.aide_id.unwrap_or_default(),
            status: body.status,
            notes: body.notes,
        },
    )
    .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::new(association))))
}

#[derive(Debug, Deserialize)]
pub struct FromInviteRequest {
    pub description: Option<String>,
    pub organisation_id: Option<String>,
}

async fn from_invite_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
    Json(body): Json<FromInviteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExtractedProject>>), ApiError> {
    let mut validator = Validator::new();
    validator.check(
        body.description.as_deref().is_some_and(|d| !d.is_empty()),
        "description is required",
    );
    validator.check(
        body.organisation_id.as_deref().is_some_and(|o| !o.is_empty()),
        "organisation_id is required",
    );
    validator.finish()?;

    let project = create_project_from_invite(
        &state.deps,
        &user.id,
        body.description.as_deref().unwrap_or_default(),
        body.organisation_id.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(project))))
}
