use anyhow::{Context, Result};
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the row store's REST interface (e.g. `https://x.supabase.co/rest/v1`)
    pub store_url: String,
    /// Service key used for privileged store requests
    pub store_service_key: String,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub aides_territoires_api_key: String,
    /// Echo freshly issued reset codes in the forgot-password response.
    /// Stand-in for the missing email delivery service; keep off outside dev.
    pub expose_reset_codes: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            store_url: env::var("STORE_URL").context("STORE_URL must be set")?,
            store_service_key: env::var("STORE_SERVICE_KEY")
                .context("STORE_SERVICE_KEY must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            aides_territoires_api_key: env::var("AIDES_TERRITOIRES_API_KEY")
                .context("AIDES_TERRITOIRES_API_KEY must be set")?,
            expose_reset_codes: env::var("EXPOSE_RESET_CODES")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}
