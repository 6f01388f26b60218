use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Organisation row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organisation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Caller-supplied organisation fields (signup and direct creation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganisationInput {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Membership join row projection: the fact that grants a user access to
/// an organisation's resources.
#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    pub organisation_id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Organisation enriched with the caller's role in it
#[derive(Debug, Clone, Serialize)]
pub struct OrganisationWithRole {
    #[serde(flatten)]
    pub organisation: Organisation,
    pub role: Option<String>,
}
