use serde_json::json;

use crate::common::ApiError;
use crate::kernel::store::{decode_first, eq, Store};

use super::models::{Organisation, OrganisationInput};

/// Create an organisation and make the caller its admin. An organisation
/// never exists without at least one membership, so a failed membership
/// insert unwinds the organisation before the error propagates.
pub async fn create_organisation(
    store: &dyn Store,
    user_id: &str,
    input: OrganisationInput,
) -> Result<Organisation, ApiError> {
    let rows = store
        .insert("organisations", serde_json::to_value(&input).map_err(anyhow::Error::from)?)
        .await?;

    let organisation: Organisation = decode_first(rows)?
        .ok_or_else(|| ApiError::Upstream("Organisation creation returned no row".into()))?;

    let membership = store
        .insert(
            "users_organisations",
            json!({
                "user_id": user_id,
                "organisation_id": organisation.id,
                "role": "admin",
            }),
        )
        .await;

    if let Err(err) = membership {
        if let Err(cleanup) = store
            .delete("organisations", &[eq("id", &organisation.id)])
            .await
        {
            tracing::error!(
                organisation_id = %organisation.id,
                error = %cleanup,
                "Failed to remove organisation after membership creation failed"
            );
        }
        return Err(err.into());
    }

    Ok(organisation)
}
