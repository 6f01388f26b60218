//! Client for the Aides Territoires grants directory.
//!
//! The proxy surface relays requests here so browser clients never talk to
//! the directory (or carry its API key) themselves. Each call authenticates
//! with the directory first (the short-lived token it issues is not cached),
//! then forwards the query. No state, no authorization logic.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const DIRECTORY_BASE_URL: &str = "https://aides-territoires.beta.gouv.fr/api";

/// Bound on the directory search call; the directory is slow under
/// complex perimeter filters.
const SEARCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum GrantsError {
    #[error("grants directory request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("grants directory returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("grants directory returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl GrantsError {
    /// Upstream status to relay to the caller, when there is one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GrantsError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[async_trait]
pub trait GrantsDirectory: Send + Sync {
    /// Obtain a short-lived directory token.
    async fn token(&self) -> Result<Value, GrantsError>;

    /// Search aids with already-translated query parameters.
    async fn search_aids(&self, params: &[(String, String)]) -> Result<Value, GrantsError>;

    /// Fetch a single backer (funding body) by id.
    async fn backer(&self, id: &str) -> Result<Value, GrantsError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

pub struct GrantsClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GrantsClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, DIRECTORY_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn authenticate(&self) -> Result<String, GrantsError> {
        let response = self
            .client
            .post(format!("{}/connexion/", self.base_url))
            .header("X-AUTH-TOKEN", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GrantsError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GrantsError::InvalidResponse(format!("token payload: {e}")))?;

        Ok(token.token)
    }

    async fn relay_json(&self, response: reqwest::Response) -> Result<Value, GrantsError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(GrantsError::Upstream {
                status: status.as_u16(),
                detail: body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| GrantsError::InvalidResponse(format!("not valid JSON: {e}")))
    }
}

#[async_trait]
impl GrantsDirectory for GrantsClient {
    async fn token(&self) -> Result<Value, GrantsError> {
        let response = self
            .client
            .post(format!("{}/connexion/", self.base_url))
            .header("X-AUTH-TOKEN", &self.api_key)
            .send()
            .await?;

        self.relay_json(response).await
    }

    async fn search_aids(&self, params: &[(String, String)]) -> Result<Value, GrantsError> {
        let token = self.authenticate().await?;

        tracing::debug!(params = ?params, "Relaying aid search to the grants directory");

        let response = self
            .client
            .get(format!("{}/aids/", self.base_url))
            .bearer_auth(token)
            .query(params)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        self.relay_json(response).await
    }

    async fn backer(&self, id: &str) -> Result<Value, GrantsError> {
        let token = self.authenticate().await?;

        let response = self
            .client
            .get(format!("{}/backers/{}", self.base_url, id))
            .bearer_auth(token)
            .send()
            .await?;

        self.relay_json(response).await
    }
}
