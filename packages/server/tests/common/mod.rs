//! Test harness driving the real router against in-memory collaborators.
//!
//! The row store, the extraction service, and the grants directory are all
//! external systems; the harness swaps in the mock implementations and
//! exercises the full middleware + routing + handler stack in-process.

// not every test binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_core::domains::auth::JwtService;
use api_core::kernel::test_dependencies::{MemoryStore, MockExtractor, MockGrantsDirectory};
use api_core::kernel::{ProjectDraft, ServerDeps};
use api_core::server::build_app;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub jwt: Arc<JwtService>,
    pub extractor: Arc<MockExtractor>,
    pub grants: Arc<MockGrantsDirectory>,
}

pub struct TestAppBuilder {
    extractor: Arc<MockExtractor>,
    grants: Arc<MockGrantsDirectory>,
    expose_reset_codes: bool,
}

impl TestAppBuilder {
    pub fn extractor(mut self, extractor: Arc<MockExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn grants(mut self, grants: Arc<MockGrantsDirectory>) -> Self {
        self.grants = grants;
        self
    }

    pub fn hide_reset_codes(mut self) -> Self {
        self.expose_reset_codes = false;
        self
    }

    pub fn build(self) -> TestApp {
        let store = MemoryStore::new();
        let jwt = Arc::new(JwtService::new(TEST_JWT_SECRET));

        let deps = Arc::new(ServerDeps::new(
            store.clone(),
            self.extractor.clone(),
            self.grants.clone(),
            jwt.clone(),
            self.expose_reset_codes,
        ));

        TestApp {
            app: build_app(deps),
            store,
            jwt,
            extractor: self.extractor,
            grants: self.grants,
        }
    }
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            extractor: MockExtractor::returning(ProjectDraft {
                title: "Extracted title".into(),
                summary: "Extracted summary".into(),
                description: None,
                keywords: vec!["keyword-one".into(), "keyword-two".into()],
            }),
            grants: MockGrantsDirectory::empty(),
            // most reset tests need to see the issued code
            expose_reset_codes: true,
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", path, token, Some(body)).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", path, token, None).await
    }

    pub async fn patch(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("PATCH", path, token, Some(body)).await
    }

    /// Run a signup and return `(user_id, organisation_id, token)`.
    pub async fn signup(&self, email: &str, organisation_name: &str) -> (String, String, String) {
        let (status, body) = self
            .post(
                "/auth/signup",
                None,
                json!({
                    "email": email,
                    "password": "longenough1",
                    "full_name": "A B",
                    "organisation": {"name": organisation_name},
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

        (
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
            body["data"]["organisation"]["id"]
                .as_str()
                .unwrap()
                .to_string(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }
}
