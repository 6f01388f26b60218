use serde_json::{json, Map, Value};

use crate::common::ApiError;
use crate::domains::projects::authz::authorize_project;
use crate::domains::projects::models::{Project, ProjectWithOrganisation};
use crate::kernel::store::{columns, decode_first, eq, Store};

#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl UpdateProjectInput {
    fn into_patch(self) -> Map<String, Value> {
        let mut patch = Map::new();
        if let Some(title) = self.title {
            patch.insert("title".into(), json!(title));
        }
        if let Some(summary) = self.summary {
            patch.insert("summary".into(), json!(summary));
        }
        if let Some(description) = self.description {
            patch.insert("description".into(), json!(description));
        }
        patch
    }
}

/// Update a project's descriptive fields. Authorization is resolved before
/// the payload is judged, so an empty update on a forbidden project still
/// answers 403, and on an unknown one 404.
pub async fn update_project(
    store: &dyn Store,
    user_id: &str,
    project_id: &str,
    input: UpdateProjectInput,
) -> Result<ProjectWithOrganisation, ApiError> {
    let organisation_id = authorize_project(store, user_id, project_id).await?;

    let patch = input.into_patch();
    if patch.is_empty() {
        return Err(ApiError::Validation(vec![
            "at least one of title, summary, description is required".into(),
        ]));
    }

    store
        .update("projects", Value::Object(patch), &[eq("id", project_id)])
        .await?;

    let project: Project = decode_first(
        store
            .select("projects", &[columns("*"), eq("id", project_id)])
            .await?,
    )?
    .ok_or_else(|| ApiError::NotFound("Project not found after update".into()))?;

    Ok(ProjectWithOrganisation {
        project,
        organisation_id,
    })
}
