use crate::common::ApiError;
use crate::kernel::store::{any_of, columns, decode_rows, eq, Store, StoreResult};

use super::models::{Membership, Organisation, OrganisationWithRole};

/// All organisations the user belongs to, each carrying the user's role.
pub async fn organisations_for_user(
    store: &dyn Store,
    user_id: &str,
) -> Result<Vec<OrganisationWithRole>, ApiError> {
    let memberships: Vec<Membership> = decode_rows(
        store
            .select(
                "users_organisations",
                &[columns("organisation_id,role"), eq("user_id", user_id)],
            )
            .await?,
    )?;

    if memberships.is_empty() {
        return Ok(Vec::new());
    }

    let organisation_ids: Vec<String> = memberships
        .iter()
        .map(|membership| membership.organisation_id.clone())
        .collect();

    let organisations: Vec<Organisation> = decode_rows(
        store
            .select(
                "organisations",
                &[columns("*"), any_of("id", &organisation_ids)],
            )
            .await?,
    )?;

    Ok(organisations
        .into_iter()
        .map(|organisation| {
            let role = memberships
                .iter()
                .find(|membership| membership.organisation_id == organisation.id)
                .and_then(|membership| membership.role.clone());
            OrganisationWithRole { organisation, role }
        })
        .collect())
}

/// Binary membership check: does the user hold any role in the
/// organisation? Any role value is sufficient.
pub async fn is_member(
    store: &dyn Store,
    user_id: &str,
    organisation_id: &str,
) -> StoreResult<bool> {
    let rows = store
        .select(
            "users_organisations",
            &[
                columns("role"),
                eq("user_id", user_id),
                eq("organisation_id", organisation_id),
            ],
        )
        .await?;

    Ok(!rows.is_empty())
}
