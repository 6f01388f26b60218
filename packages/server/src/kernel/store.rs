//! Generic REST interface to the external row store.
//!
//! The store speaks a PostgREST-style dialect: resources are table names,
//! filters are query parameters like `email=eq.a@b.com` or `id=in.(1,2)`,
//! and every operation returns the affected rows as JSON. The core never
//! assumes anything about the engine behind that interface.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("store returned an unexpected row shape: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// `("email", "eq.a@b.com")`
pub fn eq(column: &str, value: &str) -> (String, String) {
    (column.to_string(), format!("eq.{value}"))
}

/// `("id", "in.(1,2,3)")`
pub fn any_of(column: &str, values: &[String]) -> (String, String) {
    (column.to_string(), format!("in.({})", values.join(",")))
}

/// `("select", "id,email")`
pub fn columns(list: &str) -> (String, String) {
    ("select".to_string(), list.to_string())
}

/// Generic row-store interface: `execute(method, resource, body, filters)`
/// returns the affected rows. The provided methods are thin conveniences
/// over `execute`; implementations only supply `execute` itself.
#[async_trait]
pub trait Store: Send + Sync {
    async fn execute(
        &self,
        method: Method,
        resource: &str,
        body: Option<Value>,
        filters: &[(String, String)],
    ) -> StoreResult<Vec<Value>>;

    async fn select(
        &self,
        resource: &str,
        filters: &[(String, String)],
    ) -> StoreResult<Vec<Value>> {
        self.execute(Method::GET, resource, None, filters).await
    }

    async fn insert(&self, resource: &str, body: Value) -> StoreResult<Vec<Value>> {
        self.execute(Method::POST, resource, Some(body), &[]).await
    }

    async fn update(
        &self,
        resource: &str,
        body: Value,
        filters: &[(String, String)],
    ) -> StoreResult<Vec<Value>> {
        self.execute(Method::PATCH, resource, Some(body), filters)
            .await
    }

    async fn delete(&self, resource: &str, filters: &[(String, String)]) -> StoreResult<Vec<Value>> {
        self.execute(Method::DELETE, resource, None, filters).await
    }
}

/// Deserialize rows into a typed projection.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

/// Deserialize the first returned row, if any.
pub fn decode_first<T: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Option<T>> {
    match rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}

/// Row store client over HTTP.
pub struct HttpStore {
    base_url: String,
    service_key: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: String, service_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client for the row store")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            client,
        })
    }
}

#[async_trait]
impl Store for HttpStore {
    async fn execute(
        &self,
        method: Method,
        resource: &str,
        body: Option<Value>,
        filters: &[(String, String)],
    ) -> StoreResult<Vec<Value>> {
        let url = format!("{}/{}", self.base_url, resource);

        let mut request = self
            .client
            .request(method, &url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            // Ask the store to return affected rows on writes
            .header("Prefer", "return=representation")
            .query(filters);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&text)? {
            Value::Array(rows) => Ok(rows),
            single => Ok(vec![single]),
        }
    }
}
