//! Funding-opportunity associations for a project.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::ApiError;
use crate::domains::projects::authz::authorize_project;
use crate::domains::projects::models::{AideWithAssociation, ProjectAide};
use crate::kernel::store::{any_of, columns, decode_first, decode_rows, eq, Store};

#[derive(Debug, Clone, Deserialize)]
struct AssociationStatus {
    aide_id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Aide ids come back from the directory import as strings or numbers;
/// compare them in string space.
fn id_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// All aides associated with a project, each carrying its tracking fields.
pub async fn list_project_aides(
    store: &dyn Store,
    user_id: &str,
    project_id: &str,
) -> Result<Vec<AideWithAssociation>, ApiError> {
    authorize_project(store, user_id, project_id).await?;

    let associations: Vec<AssociationStatus> = decode_rows(
        store
            .select(
                "projects_aides",
                &[
                    columns("aide_id,status,notes,updated_at"),
                    eq("project_id", project_id),
                ],
            )
            .await?,
    )?;

    if associations.is_empty() {
        return Ok(Vec::new());
    }

    let aide_ids: Vec<String> = associations
        .iter()
        .map(|association| association.aide_id.clone())
        .collect();

    let aides = store
        .select("aides", &[columns("*"), any_of("id", &aide_ids)])
        .await?;

    Ok(aides
        .into_iter()
        .map(|aide| {
            let association = aide
                .get("id")
                .map(id_as_string)
                .and_then(|id| associations.iter().find(|a| a.aide_id == id));

            AideWithAssociation {
                status: association.and_then(|a| a.status.clone()),
                notes: association.and_then(|a| a.notes.clone()),
                updated_at: association.and_then(|a| a.updated_at),
                aide,
            }
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct AssociateAideInput {
    pub aide_id: String,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Idempotent upsert of a `(project_id, aide_id)` association. Repeated
/// calls converge on the latest write; no duplicate rows are created.
/// Returns whether a new row was inserted.
pub async fn associate_aide(
    store: &dyn Store,
    user_id: &str,
    project_id: &str,
    input: AssociateAideInput,
) -> Result<(bool, ProjectAide), ApiError> {
    authorize_project(store, user_id, project_id).await?;

    let aides = store
        .select("aides", &[columns("id"), eq("id", &input.aide_id)])
        .await?;
    if aides.is_empty() {
        return Err(ApiError::NotFound("Aide not found".into()));
    }

    #[derive(Deserialize)]
    struct ExistingAssociation {
        id: String,
    }

    let existing: Option<ExistingAssociation> = decode_first(
        store
            .select(
                "projects_aides",
                &[
                    columns("id"),
                    eq("project_id", project_id),
                    eq("aide_id", &input.aide_id),
                ],
            )
            .await?,
    )?;

    if let Some(existing) = existing {
        let updated_at = Utc::now();

        store
            .update(
                "projects_aides",
                json!({
                    "status": input.status,
                    "notes": input.notes,
                    "updated_at": updated_at.to_rfc3339(),
                }),
                &[eq("id", &existing.id)],
            )
            .await?;

        return Ok((
            false,
            ProjectAide {
                id: Some(existing.id),
                project_id: project_id.to_string(),
                aide_id: input.aide_id,
                status: input.status,
                notes: input.notes,
                updated_at: Some(updated_at),
            },
        ));
    }

    let association: ProjectAide = decode_first(
        store
            .insert(
                "projects_aides",
                json!({
                    "project_id": project_id,
                    "aide_id": input.aide_id,
                    "status": input.status,
                    "notes": input.notes,
                }),
            )
            .await?,
    )?
    .ok_or_else(|| ApiError::Upstream("Aide association returned no row".into()))?;

    Ok((true, association))
}
