use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{middleware::Next, response::Response};
use tracing::debug;

use crate::common::ApiError;
use crate::domains::auth::JwtService;

/// Authenticated user identity decoded from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
}

/// Session authentication middleware
///
/// Reads the bearer token from the Authorization header, verifies it, and
/// attaches the decoded identity to the request extensions. The request
/// always continues; handlers that require an identity extract [`AuthUser`]
/// and get a 401 when none was attached. Verification is purely a function
/// of the token itself; the store is never consulted here.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(user) = extract_auth_user(&request, &jwt_service) {
        debug!(user_id = %user.id, "Authenticated request");
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

/// Extract and verify the bearer token from a request. Missing header,
/// missing `Bearer ` prefix, and any verification failure all yield `None`.
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;

    let claims = jwt_service.verify(token).ok()?;

    Some(AuthUser {
        id: claims.id,
        email: claims.email,
        full_name: claims.full_name,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}
