use serde::Deserialize;

use crate::common::ApiError;
use crate::domains::organisations::Membership;
use crate::domains::projects::models::{Project, ProjectWithOrganisation};
use crate::kernel::store::{any_of, columns, decode_first, decode_rows, eq, Store};

#[derive(Deserialize)]
struct ProjectLink {
    project_id: String,
}

/// Every project belonging to any of the user's organisations.
pub async fn list_projects(
    store: &dyn Store,
    user_id: &str,
) -> Result<Vec<ProjectWithOrganisation>, ApiError> {
    let memberships: Vec<Membership> = decode_rows(
        store
            .select(
                "users_organisations",
                &[columns("organisation_id"), eq("user_id", user_id)],
            )
            .await?,
    )?;

    let mut all_projects = Vec::new();

    for membership in &memberships {
        let links: Vec<ProjectLink> = decode_rows(
            store
                .select(
                    "projects_organisations",
                    &[
                        columns("project_id"),
                        eq("organisation_id", &membership.organisation_id),
                    ],
                )
                .await?,
        )?;

        if links.is_empty() {
            continue;
        }

        let project_ids: Vec<String> = links.into_iter().map(|link| link.project_id).collect();

        let projects: Vec<Project> = decode_rows(
            store
                .select("projects", &[columns("*"), any_of("id", &project_ids)])
                .await?,
        )?;

        all_projects.extend(projects.into_iter().map(|project| ProjectWithOrganisation {
            project,
            organisation_id: membership.organisation_id.clone(),
        }));
    }

    Ok(all_projects)
}

/// Fetch one project, walking the ownership chain. The project row is
/// resolved first so a missing project and a missing link both read as
/// not found before any access decision is made.
pub async fn get_project(
    store: &dyn Store,
    user_id: &str,
    project_id: &str,
) -> Result<ProjectWithOrganisation, ApiError> {
    let project: Project = decode_first(
        store
            .select("projects", &[columns("*"), eq("id", project_id)])
            .await?,
    )?
    .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;

    let organisation_id =
        crate::domains::projects::authz::authorize_project(store, user_id, project_id).await?;

    Ok(ProjectWithOrganisation {
        project,
        organisation_id,
    })
}
