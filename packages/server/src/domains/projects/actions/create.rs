use serde_json::json;

use crate::common::ApiError;
use crate::domains::projects::authz::require_member;
use crate::domains::projects::models::{Project, ProjectWithOrganisation};
use crate::kernel::store::{decode_first, Store};

#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub organisation_id: String,
}

/// Create a project inside one of the caller's organisations and link it
/// to that organisation.
pub async fn create_project(
    store: &dyn Store,
    user_id: &str,
    input: CreateProjectInput,
) -> Result<ProjectWithOrganisation, ApiError> {
    require_member(store, user_id, &input.organisation_id).await?;

    let project: Project = decode_first(
        store
            .insert(
                "projects",
                json!({
                    "title": input.title,
                    "summary": input.summary,
                    "description": input.description,
                }),
            )
            .await?,
    )?
    .ok_or_else(|| ApiError::Upstream("Project creation returned no row".into()))?;

    store
        .insert(
            "projects_organisations",
            json!({
                "project_id": project.id,
                "organisation_id": input.organisation_id,
            }),
        )
        .await?;

    Ok(ProjectWithOrganisation {
        project,
        organisation_id: input.organisation_id,
    })
}
