//! Server dependencies (using traits for testability)
//!
//! Central dependency container injected into every handler. All external
//! collaborators are trait objects so tests can swap in the mocks from
//! `test_dependencies`.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::extraction_client::{OpenAiExtractor, ProjectExtractor};
use crate::kernel::grants_client::{GrantsClient, GrantsDirectory};
use crate::kernel::store::{HttpStore, Store};

/// Server dependencies accessible to handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn Store>,
    pub extractor: Arc<dyn ProjectExtractor>,
    pub grants: Arc<dyn GrantsDirectory>,
    pub jwt_service: Arc<JwtService>,
    /// Echo reset codes in forgot-password responses (dev only)
    pub expose_reset_codes: bool,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn Store>,
        extractor: Arc<dyn ProjectExtractor>,
        grants: Arc<dyn GrantsDirectory>,
        jwt_service: Arc<JwtService>,
        expose_reset_codes: bool,
    ) -> Self {
        Self {
            store,
            extractor,
            grants,
            jwt_service,
            expose_reset_codes,
        }
    }

    /// Wire up the production collaborators from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(HttpStore::new(
            config.store_url.clone(),
            config.store_service_key.clone(),
        )?);
        let extractor = Arc::new(OpenAiExtractor::new(config.openai_api_key.clone())?);
        let grants = Arc::new(GrantsClient::new(
            config.aides_territoires_api_key.clone(),
        )?);
        let jwt_service = Arc::new(JwtService::new(&config.jwt_secret));

        Ok(Self::new(
            store,
            extractor,
            grants,
            jwt_service,
            config.expose_reset_codes,
        ))
    }
}
