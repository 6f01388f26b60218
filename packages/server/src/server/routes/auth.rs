//! Authentication surface: signup, login, profile, password reset.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::common::{is_valid_email, ApiError, ApiResponse, MessageResponse, Validator};
use crate::domains::auth::{
    consume_reset, current_user, login, request_reset, signup, PublicUser, SignupInput,
};
use crate::domains::organisations::{Organisation, OrganisationInput, OrganisationWithRole};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

pub fn routes() -> Router {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .route("/forgot-password", post(forgot_password_handler))
        .route("/reset-password", post(reset_password_handler))
}

// Request fields are all optional at the serde level so missing values
// surface as per-field validation messages instead of a decode rejection.

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub organisation: Option<SignupOrganisation>,
}

#[derive(Debug, Deserialize)]
pub struct SignupOrganisation {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub siret: Option<String>,
    pub address: Option<String>,
}

impl SignupRequest {
    fn validate(self) -> Result<SignupInput, ApiError> {
        let mut validator = Validator::new();

        validator.check(
            self.email.as_deref().is_some_and(is_valid_email),
            "email must be a valid email address",
        );
        validator.check(
            self.password.as_deref().is_some_and(|p| p.len() >= 8),
            "password must be at least 8 characters",
        );
        validator.check(
            self.full_name.as_deref().is_some_and(|n| !n.is_empty()),
            "full_name is required",
        );
        let organisation_name = self
            .organisation
            .as_ref()
            .and_then(|organisation| organisation.name.clone());
        validator.check(
            organisation_name.as_deref().is_some_and(|n| !n.is_empty()),
            "organisation.name is required",
        );

        validator.finish()?;

        let organisation = self.organisation.unwrap_or(SignupOrganisation {
            name: None,
            kind: None,
            siret: None,
            address: None,
        });

        Ok(SignupInput {
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            full_name: self.full_name.unwrap_or_default(),
            organisation: OrganisationInput {
                name: organisation_name.unwrap_or_default(),
                kind: organisation.kind,
                siret: organisation.siret,
                address: organisation.address,
            },
        })
    }
}

#[derive(Serialize)]
pub struct SignupData {
    pub user: PublicUser,
    pub organisation: Organisation,
    pub token: String,
}

async fn signup_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SignupData>>), ApiError> {
    let input = body.validate()?;
    let outcome = signup(&state.deps, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(SignupData {
            user: outcome.user,
            organisation: outcome.organisation,
            token: outcome.token,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginData {
    pub user: PublicUser,
    pub organisations: Vec<OrganisationWithRole>,
    pub token: String,
}

async fn login_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>, ApiError> {
    let mut validator = Validator::new();
    validator.check(
        body.email.as_deref().is_some_and(is_valid_email),
        "email must be a valid email address",
    );
    validator.check(
        body.password.as_deref().is_some_and(|p| !p.is_empty()),
        "password is required",
    );
    validator.finish()?;

    let outcome = login(
        &state.deps,
        body.email.as_deref().unwrap_or_default(),
        body.password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(ApiResponse::new(LoginData {
        user: outcome.user,
        organisations: outcome.organisations,
        token: outcome.token,
    })))
}

#[derive(Serialize)]
pub struct MeData {
    pub user: PublicUser,
    pub organisations: Vec<OrganisationWithRole>,
}

async fn me_handler(
    Extension(state): Extension<AxumAppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<MeData>>, ApiError> {
    let (user, organisations) = current_user(&state.deps, &user.id).await?;

    Ok(Json(ApiResponse::new(MeData {
        user,
        organisations,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// Same generic answer whether or not the account exists. The issued code
/// is echoed only when the dev flag is on; the email collaborator that
/// should carry it is not part of this service.
#[derive(Serialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_code: Option<String>,
}

async fn forgot_password_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, ApiError> {
    let mut validator = Validator::new();
    validator.check(
        body.email.as_deref().is_some_and(is_valid_email),
        "email must be a valid email address",
    );
    validator.finish()?;

    let code = request_reset(
        state.deps.store.as_ref(),
        body.email.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: "If your email is registered, you will receive a reset code.".into(),
        reset_code: if state.deps.expose_reset_codes {
            code
        } else {
            None
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub reset_code: Option<String>,
    pub new_password: Option<String>,
}

async fn reset_password_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut validator = Validator::new();
    validator.check(
        body.email.as_deref().is_some_and(is_valid_email),
        "email must be a valid email address",
    );
    validator.check(
        body.reset_code.as_deref().is_some_and(|c| !c.is_empty()),
        "reset_code is required",
    );
    validator.check(
        body.new_password.as_deref().is_some_and(|p| p.len() >= 8),
        "new_password must be at least 8 characters",
    );
    validator.finish()?;

    consume_reset(
        state.deps.store.as_ref(),
        body.email.as_deref().unwrap_or_default(),
        body.reset_code.as_deref().unwrap_or_default(),
        body.new_password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(MessageResponse::new("Password reset successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_validation_reports_every_missing_field() {
        let request = SignupRequest {
            email: Some("not-an-email".into()),
            password: Some("short".into()),
            full_name: None,
            organisation: Some(SignupOrganisation {
                name: None,
                kind: None,
                siret: None,
                address: None,
            }),
        };

        match request.validate().unwrap_err() {
            ApiError::Validation(messages) => assert_eq!(messages.len(), 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_signup_payload_passes() {
        let request = SignupRequest {
            email: Some("a@b.com".into()),
            password: Some("longenough1".into()),
            full_name: Some("A B".into()),
            organisation: Some(SignupOrganisation {
                name: Some("Org".into()),
                kind: Some("association".into()),
                siret: None,
                address: None,
            }),
        };

        let input = request.validate().unwrap();
        assert_eq!(input.organisation.name, "Org");
        assert_eq!(input.organisation.kind.as_deref(), Some("association"));
    }
}
