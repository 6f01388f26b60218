use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::kernel::store::StoreError;

/// API error taxonomy. Every failure surfaces as the uniform
/// `{success: false, error, code, details?}` envelope with a contractual
/// status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request data")]
    Validation(Vec<String>),

    #[error("Unauthorized - missing or invalid token")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("A user with this email already exists")]
    UserExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired reset code")]
    InvalidResetCode,

    /// Upstream collaborator (store, extraction, grants directory) failed.
    #[error("{0}")]
    Upstream(String),

    /// Relay an upstream HTTP status as-is (proxy surface).
    #[error("{error}")]
    Relay {
        status: u16,
        error: String,
        details: Option<String>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Error envelope returned for all failures
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UserExists => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidResetCode => StatusCode::BAD_REQUEST,
            ApiError::Relay { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Upstream(_) | ApiError::Store(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "BAD_REQUEST",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::UserExists => "USER_EXISTS",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::InvalidResetCode => "INVALID_RESET_CODE",
            ApiError::Relay { .. } => "UPSTREAM_ERROR",
            ApiError::Upstream(_) | ApiError::Store(_) | ApiError::Internal(_) => "SERVER_ERROR",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation(messages) => Some(serde_json::json!(messages)),
            ApiError::Relay { details, .. } => {
                details.as_ref().map(|d| serde_json::Value::String(d.clone()))
            }
            ApiError::Store(err) => Some(serde_json::Value::String(err.to_string())),
            ApiError::Internal(err) => Some(serde_json::Value::String(err.to_string())),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        // Internal detail stays out of the client-facing message for 500s;
        // it is still carried in `details` to match the source contract.
        let error = match &self {
            ApiError::Store(_) | ApiError::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            success: false,
            error,
            code: self.code().to_string(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contractual_status_codes() {
        assert_eq!(
            ApiError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("no access".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("missing".into()).status(),
            StatusCode::NOT_FOUND
        );
        // Duplicate email is a 400 with its own code, not a 409
        assert_eq!(ApiError::UserExists.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UserExists.code(), "USER_EXISTS");
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidResetCode.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn relay_keeps_upstream_status() {
        let err = ApiError::Relay {
            status: 503,
            error: "directory unavailable".into(),
            details: None,
        };
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn validation_details_are_per_field() {
        let err = ApiError::Validation(vec![
            "email must be a valid email address".into(),
            "password must be at least 8 characters".into(),
        ]);
        let details = err.details().unwrap();
        assert_eq!(details.as_array().unwrap().len(), 2);
    }
}
