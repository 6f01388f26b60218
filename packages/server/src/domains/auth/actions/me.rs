use crate::common::ApiError;
use crate::domains::auth::models::PublicUser;
use crate::domains::organisations::{organisations_for_user, OrganisationWithRole};
use crate::kernel::store::{columns, decode_first, eq, Store};
use crate::kernel::ServerDeps;

/// The authenticated user's profile and organisations. The token may
/// outlive the row it refers to, hence the 404 path.
pub async fn current_user(
    deps: &ServerDeps,
    user_id: &str,
) -> Result<(PublicUser, Vec<OrganisationWithRole>), ApiError> {
    let store = deps.store.as_ref();

    let user: PublicUser = decode_first(
        store
            .select(
                "users",
                &[columns("id,email,full_name,created_at"), eq("id", user_id)],
            )
            .await?,
    )?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let organisations = organisations_for_user(store, &user.id).await?;

    Ok((user, organisations))
}
