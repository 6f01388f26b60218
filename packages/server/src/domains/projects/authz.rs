//! Ownership-chain authorization: Project → Organisation → Membership.
//!
//! A project with no organisation link is reported as not found, exactly
//! like a missing project, so callers cannot probe which ids exist.
//! Existence is always resolved before access rights.

use serde::Deserialize;

use crate::common::ApiError;
use crate::domains::organisations::is_member;
use crate::kernel::store::{columns, decode_first, eq, Store};

#[derive(Deserialize)]
struct OrganisationLink {
    organisation_id: String,
}

/// The organisation owning a project, via its link row.
pub async fn organisation_for_project(
    store: &dyn Store,
    project_id: &str,
) -> Result<String, ApiError> {
    let link: Option<OrganisationLink> = decode_first(
        store
            .select(
                "projects_organisations",
                &[columns("organisation_id"), eq("project_id", project_id)],
            )
            .await?,
    )?;

    link.map(|link| link.organisation_id)
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))
}

/// Binary access check on an organisation.
pub async fn require_member(
    store: &dyn Store,
    user_id: &str,
    organisation_id: &str,
) -> Result<(), ApiError> {
    if is_member(store, user_id, organisation_id).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not have access to this organisation".into(),
        ))
    }
}

/// Walk the full chain for a project-scoped operation and return the
/// owning organisation id.
pub async fn authorize_project(
    store: &dyn Store,
    user_id: &str,
    project_id: &str,
) -> Result<String, ApiError> {
    let organisation_id = organisation_for_project(store, project_id).await?;

    if !is_member(store, user_id, &organisation_id).await? {
        return Err(ApiError::Forbidden(
            "You do not have access to this project".into(),
        ));
    }

    Ok(organisation_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MemoryStore;
    use serde_json::json;

    fn seeded_store() -> std::sync::Arc<MemoryStore> {
        let store = MemoryStore::new();
        store.seed("projects", vec![json!({"id": "p1", "title": "T"})]);
        store.seed(
            "projects_organisations",
            vec![json!({"project_id": "p1", "organisation_id": "org1"})],
        );
        store.seed(
            "users_organisations",
            vec![json!({"user_id": "u1", "organisation_id": "org1", "role": "member"})],
        );
        store
    }

    #[tokio::test]
    async fn member_passes_the_chain() {
        let store = seeded_store();
        let org = authorize_project(store.as_ref(), "u1", "p1").await.unwrap();
        assert_eq!(org, "org1");
    }

    #[tokio::test]
    async fn non_member_is_forbidden_even_for_a_valid_project() {
        let store = seeded_store();
        let err = authorize_project(store.as_ref(), "stranger", "p1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn linkless_project_reads_as_not_found() {
        let store = seeded_store();
        // a project row with no organisation link
        store.seed("projects", vec![json!({"id": "dangling", "title": "X"})]);

        let err = authorize_project(store.as_ref(), "u1", "dangling")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn existence_is_resolved_before_access() {
        let store = seeded_store();
        // stranger probing an id that does not exist gets 404, not 403
        let err = authorize_project(store.as_ref(), "stranger", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn any_role_value_is_sufficient() {
        let store = seeded_store();
        store.seed(
            "users_organisations",
            vec![json!({"user_id": "u2", "organisation_id": "org1", "role": "viewer"})],
        );
        assert!(authorize_project(store.as_ref(), "u2", "p1").await.is_ok());
    }
}
