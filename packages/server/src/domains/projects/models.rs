use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Project row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Project joined with its owning organisation. Clients always see a
/// project through its organisation.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithOrganisation {
    #[serde(flatten)]
    pub project: Project,
    pub organisation_id: String,
}

/// Project ↔ aide association row, unique per `(project_id, aide_id)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub project_id: String,
    pub aide_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A funding opportunity as seen from a project: the opaque directory
/// record plus the association's tracking fields.
#[derive(Debug, Clone, Serialize)]
pub struct AideWithAssociation {
    #[serde(flatten)]
    pub aide: Value,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
