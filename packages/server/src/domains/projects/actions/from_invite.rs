use serde::Serialize;
use serde_json::json;

use crate::common::ApiError;
use crate::domains::projects::authz::require_member;
use crate::domains::projects::models::Project;
use crate::kernel::store::{decode_first, Store};
use crate::kernel::{ProjectExtractor, ServerDeps};

/// A project created from free text, with the extracted search keywords.
#[derive(Debug, Serialize)]
pub struct ExtractedProject {
    #[serde(flatten)]
    pub project: Project,
    pub organisation_id: String,
    pub keywords: Vec<String>,
}

/// Turn a free-text project description into a structured project via the
/// extraction service, then persist it like any other project.
pub async fn create_project_from_invite(
    deps: &ServerDeps,
    user_id: &str,
    description: &str,
    organisation_id: &str,
) -> Result<ExtractedProject, ApiError> {
    let store = deps.store.as_ref();

    require_member(store, user_id, organisation_id).await?;

    let draft = deps
        .extractor
        .extract(description)
        .await
        .map_err(|e| ApiError::Upstream(format!("Invite processing failed: {e}")))?;

    tracing::debug!(title = %draft.title, "Extraction produced a project draft");

    let project: Project = decode_first(
        store
            .insert(
                "projects",
                json!({
                    "title": draft.title,
                    "summary": draft.summary,
                    "description": draft.description,
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
                "organisation_id": organisation_id,
            }),
        )
        .await?;

    Ok(ExtractedProject {
        project,
        organisation_id: organisation_id.to_string(),
        keywords: draft.keywords,
    })
}
