use crate::common::ApiError;
use crate::domains::auth::models::{PublicUser, User};
use crate::domains::auth::password;
use crate::domains::organisations::{organisations_for_user, OrganisationWithRole};
use crate::kernel::store::{columns, decode_first, eq, Store};
use crate::kernel::ServerDeps;

pub struct LoginOutcome {
    pub user: PublicUser,
    pub organisations: Vec<OrganisationWithRole>,
    pub token: String,
}

/// Verify credentials and open a session. A missing user and a wrong
/// password surface the same way.
pub async fn login(deps: &ServerDeps, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
    let store = deps.store.as_ref();

    let user: User = decode_first(
        store
            .select("users", &[columns("*"), eq("email", email)])
            .await?,
    )?
    .ok_or(ApiError::InvalidCredentials)?;

    let digest = user.password_hash.as_deref().unwrap_or_default();
    if !password::verify(password, digest) {
        return Err(ApiError::InvalidCredentials);
    }

    let organisations = organisations_for_user(store, &user.id).await?;

    let token = deps
        .jwt_service
        .issue(&user.id, &user.email, &user.full_name)
        .map_err(anyhow::Error::from)?;

    Ok(LoginOutcome {
        user: user.into(),
        organisations,
        token,
    })
}
