use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::Payload;
use crate::api::response::Envelope;
use crate::api::state::AppState;
use crate::api::validation::{FieldErrors, REQUIRED};
use crate::auth::jwt::{create_token, issue_token_pair, verify_token, TokenError, TokenKind};
use crate::auth::password::{check_password_policy, hash_password, verify_password};
use crate::domain::notifications::EmailMessage;
use crate::domain::repositories::User;
use crate::domain::user::{Email, Username};

const INVALID_CREDENTIALS: &str = "Invalid credentials, try again";
const INVALID_TOKEN: &str = "Invalid token";

/// Request body for user registration
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The newly registered account
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyEmailQuery {
    /// Verification token from the emailed link
    pub token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyEmailResponse {
    pub email: String,
}

/// Request body for user login
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokensResponse {
    pub access: String,
    pub refresh: String,
}

/// Response from successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub email: String,
    pub username: String,
    pub tokens: TokensResponse,
}

/// Validated registration input
struct NewAccount {
    email: Email,
    username: Username,
    password: String,
}

impl RegisterRequest {
    fn validate(self) -> Result<NewAccount, ApiError> {
        let mut errors = FieldErrors::new();

        let email = check_field(&mut errors, "email", self.email, Email::new);
        let username = check_field(&mut errors, "username", self.username, Username::new);
        let password = check_field(&mut errors, "password", self.password, |password| {
            check_password_policy(&password).map(|()| password)
        });

        errors.finish()?;

        match (email, username, password) {
            (Some(email), Some(username), Some(password)) => Ok(NewAccount {
                email,
                username,
                password,
            }),
            _ => Err(ApiError::bad_request("Invalid registration")),
        }
    }
}

/// Runs `parse` on a required field, recording its message on failure
fn check_field<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, String>,
) -> Option<T> {
    let Some(value) = value else {
        errors.add(field, REQUIRED);
        return None;
    };

    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

fn verification_email(state: &AppState, user: &User, token: &str) -> EmailMessage {
    let link = format!(
        "{}/api/v1/auth/email-verify/?token={}",
        state.auth.public_base_url, token
    );

    EmailMessage {
        to: user.email.to_string(),
        subject: "Verify your email".to_string(),
        body: format!(
            "Hi {}, use the link below to verify your email\n{}",
            user.username, link
        ),
    }
}

/// Register a new user
///
/// POST /api/v1/auth/register/
#[utoipa::path(
    post,
    path = "/api/v1/auth/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; a verification link was emailed"),
        (status = 400, description = "Invalid fields, or email/username already taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Payload(req): Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<RegisterResponse>>), ApiError> {
    let account = req.validate()?;

    let password_hash = hash_password(&account.password).map_err(|e| {
        tracing::error!(error = %e, "Failed to hash password");
        ApiError::internal_server_error("Internal server error")
    })?;

    let user = User {
        id: Uuid::new_v4(),
        email: account.email,
        username: account.username,
        password_hash,
        is_verified: false,
        is_active: true,
        created_at: Utc::now(),
        last_login: None,
    };

    let user_id = state.users.create(user.clone()).await?;
    tracing::info!(user_id = %user_id, "User registered");

    let token = create_token(user_id, TokenKind::EmailVerification, &state.auth.jwt_secret)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create verification token");
            ApiError::internal_server_error("Internal server error")
        })?;

    // a failed delivery does not undo the registration
    if let Err(e) = state
        .mailer
        .send(verification_email(&state, &user, &token))
        .await
    {
        tracing::error!(user_id = %user_id, error = %e, "Failed to send verification email");
    }

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(RegisterResponse {
            id: user_id,
            email: user.email.to_string(),
            username: user.username.to_string(),
        })),
    ))
}

/// Confirm an email address
///
/// GET /api/v1/auth/email-verify/?token=
#[utoipa::path(
    get,
    path = "/api/v1/auth/email-verify/",
    params(VerifyEmailQuery),
    responses(
        (status = 200, description = "Account activated"),
        (status = 400, description = "Expired or invalid token")
    ),
    tag = "auth"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<Envelope<VerifyEmailResponse>>, ApiError> {
    let token = query
        .token
        .ok_or_else(|| ApiError::bad_request(INVALID_TOKEN))?;

    let claims = verify_token(&token, TokenKind::EmailVerification, &state.auth.jwt_secret)
        .map_err(|e| match e {
            TokenError::Expired => ApiError::bad_request("Activation link expired"),
            other => {
                tracing::debug!(error = %other, "Rejected verification token");
                ApiError::bad_request(INVALID_TOKEN)
            }
        })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::bad_request(INVALID_TOKEN))?;

    if !user.is_verified {
        state.users.mark_verified(user.id).await?;
        tracing::info!(user_id = %user.id, "Email verified");
    }

    Ok(Json(Envelope::new(VerifyEmailResponse {
        email: "Successfully activated".to_string(),
    })))
}

/// Login with email and password
///
/// POST /api/v1/auth/login/
#[utoipa::path(
    post,
    path = "/api/v1/auth/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens"),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Bad credentials, disabled or unverified account")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Payload(req): Payload<LoginRequest>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let mut errors = FieldErrors::new();
    let email = errors.required_text("email", req.email, Email::MAX_LEN);
    let password = check_field(&mut errors, "password", req.password, Ok);
    errors.finish()?;

    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    // a malformed address cannot belong to anyone
    let email = Email::new(email).map_err(|_| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let valid = verify_password(&password, &user.password_hash).map_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "Password verification failed");
        ApiError::internal_server_error("Internal server error")
    })?;

    if !valid {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }
    if !user.is_active {
        return Err(ApiError::unauthorized("Account disabled, contact admin"));
    }
    if !user.is_verified {
        return Err(ApiError::unauthorized("Email is not verified"));
    }

    if let Err(e) = state.users.update_last_login(user.id).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to record last login");
    }

    let tokens = issue_token_pair(user.id, &state.auth.jwt_secret).map_err(|e| {
        tracing::error!(error = %e, "Failed to create tokens");
        ApiError::internal_server_error("Internal server error")
    })?;

    Ok(Json(Envelope::new(LoginResponse {
        email: user.email.to_string(),
        username: user.username.to_string(),
        tokens: TokensResponse {
            access: tokens.access,
            refresh: tokens.refresh,
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::ErrorBody;

    #[test]
    fn register_collects_every_field_error() {
        let req = RegisterRequest {
            email: Some("not-an-email".into()),
            username: Some("bad name!".into()),
            password: Some("short".into()),
        };

        let err = req.validate().err().expect("invalid registration");
        match err.body {
            ErrorBody::Fields(fields) => {
                assert_eq!(fields.get("email").unwrap()[0], "Enter a valid email address.");
                assert!(fields.get("username").is_some());
                assert_eq!(
                    fields.get("password").unwrap()[0],
                    "Ensure this field has at least 8 characters."
                );
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn register_requires_all_fields() {
        let err = RegisterRequest::default().validate().err().expect("empty body");
        match err.body {
            ErrorBody::Fields(fields) => {
                for field in ["email", "username", "password"] {
                    assert_eq!(fields.get(field).unwrap()[0], REQUIRED);
                }
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn valid_registration_passes() {
        let req = RegisterRequest {
            email: Some("student@example.edu".into()),
            username: Some("student1".into()),
            password: Some("password123".into()),
        };

        let account = req.validate().expect("valid registration");
        assert_eq!(account.email.as_str(), "student@example.edu");
        assert_eq!(account.password, "password123");
    }
}
