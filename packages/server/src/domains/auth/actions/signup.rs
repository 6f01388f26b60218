//! Signup provisioning saga.
//!
//! Creates user, organisation, and admin membership across three store
//! calls. The store offers no cross-resource transaction, so each created
//! resource pushes a compensating delete; on any step failure the list is
//! unwound in reverse creation order before the error propagates.

use serde_json::json;

use crate::common::ApiError;
use crate::domains::auth::models::{PublicUser, User};
use crate::domains::auth::password;
use crate::domains::organisations::{Organisation, OrganisationInput};
use crate::kernel::store::{columns, decode_first, eq, Store};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub organisation: OrganisationInput,
}

#[derive(Debug)]
pub struct SignupOutcome {
    pub user: PublicUser,
    pub organisation: Organisation,
    pub token: String,
}

enum Compensation {
    DeleteUser { id: String },
    DeleteOrganisation { id: String },
}

pub async fn signup(deps: &ServerDeps, input: SignupInput) -> Result<SignupOutcome, ApiError> {
    let store = deps.store.as_ref();

    // Fast-path uniqueness check. The store's unique constraint on email is
    // the real guarantee; this read only gives the common case a clean
    // USER_EXISTS instead of a constraint violation.
    let existing = store
        .select("users", &[columns("id"), eq("email", &input.email)])
        .await?;
    if !existing.is_empty() {
        return Err(ApiError::UserExists);
    }

    let password_hash = password::hash(&input.password)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;

    let mut compensations = Vec::new();
    match provision(store, &input, &password_hash, &mut compensations).await {
        Ok((user, organisation)) => {
            let token = deps
                .jwt_service
                .issue(&user.id, &user.email, &user.full_name)
                .map_err(anyhow::Error::from)?;
            Ok(SignupOutcome {
                user,
                organisation,
                token,
            })
        }
        Err(err) => {
            tracing::warn!(email = %input.email, error = %err, "Signup failed, unwinding partial creation");
            run_compensations(store, compensations).await;
            Err(err)
        }
    }
}

/// The forward path. Every successfully created resource registers its
/// compensating delete before the next step runs.
async fn provision(
    store: &dyn Store,
    input: &SignupInput,
    password_hash: &str,
    compensations: &mut Vec<Compensation>,
) -> Result<(PublicUser, Organisation), ApiError> {
    let user: User = decode_first(
        store
            .insert(
                "users",
                json!({
                    "email": input.email,
                    "password_hash": password_hash,
                    "full_name": input.full_name,
                }),
            )
            .await?,
    )?
    .ok_or_else(|| ApiError::Upstream("User creation returned no row".into()))?;
    compensations.push(Compensation::DeleteUser {
        id: user.id.clone(),
    });

    let organisation: Organisation = decode_first(
        store
            .insert(
                "organisations",
                serde_json::to_value(&input.organisation).map_err(anyhow::Error::from)?,
            )
            .await?,
    )?
    .ok_or_else(|| ApiError::Upstream("Organisation creation returned no row".into()))?;
    compensations.push(Compensation::DeleteOrganisation {
        id: organisation.id.clone(),
    });

    store
        .insert(
            "users_organisations",
            json!({
                "user_id": user.id,
                "organisation_id": organisation.id,
                "role": "admin",
            }),
        )
        .await?;

    Ok((user.into(), organisation))
}

/// Best-effort unwind, newest resource first. A failed compensation cannot
/// mask the triggering failure, but it must not go unnoticed either.
async fn run_compensations(store: &dyn Store, compensations: Vec<Compensation>) {
    for step in compensations.into_iter().rev() {
        let (resource, id) = match &step {
            Compensation::DeleteUser { id } => ("users", id.clone()),
            Compensation::DeleteOrganisation { id } => ("organisations", id.clone()),
        };

        if let Err(err) = store.delete(resource, &[eq("id", &id)]).await {
            tracing::error!(
                resource,
                id = %id,
                error = %err,
                "Signup compensation failed; row needs manual cleanup"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domains::auth::JwtService;
    use crate::kernel::test_dependencies::{MemoryStore, MockExtractor, MockGrantsDirectory};
    use crate::kernel::ProjectDraft;

    fn test_deps(store: Arc<MemoryStore>) -> ServerDeps {
        ServerDeps::new(
            store,
            MockExtractor::returning(ProjectDraft {
                title: "t".into(),
                summary: "s".into(),
                description: None,
                keywords: vec![],
            }),
            MockGrantsDirectory::empty(),
            Arc::new(JwtService::new("test_secret")),
            false,
        )
    }

    fn input() -> SignupInput {
        SignupInput {
            email: "a@b.com".into(),
            password: "longenough1".into(),
            full_name: "A B".into(),
            organisation: OrganisationInput {
                name: "Org".into(),
                kind: None,
                siret: None,
                address: None,
            },
        }
    }

    #[tokio::test]
    async fn creates_user_organisation_and_admin_membership() {
        let store = MemoryStore::new();
        let deps = test_deps(store.clone());

        let outcome = signup(&deps, input()).await.unwrap();

        assert_eq!(outcome.organisation.name, "Org");
        let claims = deps.jwt_service.verify(&outcome.token).unwrap();
        assert_eq!(claims.id, outcome.user.id);
        assert_eq!(claims.email, "a@b.com");

        let memberships = store.rows("users_organisations");
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0]["role"], "admin");
        assert_eq!(memberships[0]["user_id"], serde_json::json!(outcome.user.id));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_a_second_row() {
        let store = MemoryStore::new();
        let deps = test_deps(store.clone());

        signup(&deps, input()).await.unwrap();
        let err = signup(&deps, input()).await.unwrap_err();

        assert!(matches!(err, ApiError::UserExists));
        assert_eq!(store.rows("users").len(), 1);
    }

    #[tokio::test]
    async fn organisation_failure_deletes_created_user() {
        let store = MemoryStore::new();
        store.fail_inserts_into("organisations");
        let deps = test_deps(store.clone());

        let err = signup(&deps, input()).await.unwrap_err();

        assert!(matches!(err, ApiError::Store(_)));
        assert!(store.rows("users").is_empty());
    }

    #[tokio::test]
    async fn membership_failure_unwinds_in_reverse_order() {
        let store = MemoryStore::new();
        store.fail_inserts_into("users_organisations");
        let deps = test_deps(store.clone());

        signup(&deps, input()).await.unwrap_err();

        assert!(store.rows("organisations").is_empty());
        assert!(store.rows("users").is_empty());

        // organisation (newest) is deleted before the user
        let deletes: Vec<String> = store
            .operations()
            .into_iter()
            .filter(|(method, _)| method == "DELETE")
            .map(|(_, resource)| resource)
            .collect();
        assert_eq!(deletes, vec!["organisations", "users"]);
    }
}
