/// Account API - sign-up, email verification, login, password reset
use super::envelope::{self, Envelope, MessageResponse, TokenResponse};
use crate::{
    error::{JsonBody, Result, ServerError},
    middleware::AuthenticatedUser,
    services::{tokens, Mail},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tunehub_core::types::{normalize_email, timestamp, validate_password, SignUp, User};
use tunehub_storage::users;

const INVALID_CREDENTIALS: &str = "Incorrect email or password";
const RESET_SENT: &str = "If an account exists for that email, a password reset link has been sent.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
}

fn required_email(email: Option<String>) -> Result<String> {
    let email = email
        .ok_or_else(|| ServerError::BadRequest("Please provide an email address.".to_string()))?;
    Ok(normalize_email(&email)?)
}

fn issue_session(state: &AppState, user: User) -> Result<Json<TokenResponse<User>>> {
    let token = state.auth_service.create_token(&user.id)?;
    Ok(envelope::token(token, user))
}

fn link(state: &AppState, path: &str, raw_token: &str) -> String {
    format!(
        "{}/api/v1/users/{path}/{raw_token}",
        state.config.server.public_url.trim_end_matches('/')
    )
}

/// POST /api/v1/users/signup
///
/// The account is removed again when the verification mail cannot be sent.
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignUp>,
) -> Result<Json<MessageResponse>> {
    let new_user = body.validate()?;
    let password_hash = state.auth_service.hash_password(&new_user.password)?;
    let token = tokens::issue(state.config.auth.email_verification_minutes);

    let user = users::create(&state.pool, &new_user, &password_hash, Some(&token.stored)).await?;

    let mail = Mail {
        from: state.config.mail.from.clone(),
        to: user.email.clone(),
        subject: "TuneHub email verification".to_string(),
        body: format!(
            "Post your email to this url to verify your account.\n{}",
            link(&state, "verify-email", &token.raw)
        ),
    };

    if let Err(e) = state.mailer.send(&mail).await {
        tracing::warn!(user_id = %user.id, "Verification mail failed, removing account");
        users::delete(&state.pool, &user.id).await?;
        return Err(ServerError::Mail(e.to_string()));
    }

    tracing::info!(user_id = %user.id, "User signed up");

    Ok(envelope::message(format!(
        "You have been registered successfully. Please verify your email (within {} minutes) to continue.",
        state.config.auth.email_verification_minutes
    )))
}

/// POST /api/v1/users/verify-email/:token
pub async fn verify_email(
    State(state): State<AppState>,
    Path(raw_token): Path<String>,
    JsonBody(body): JsonBody<EmailRequest>,
) -> Result<Json<TokenResponse<User>>> {
    let email = required_email(body.email)?;
    let digest = tokens::digest(&raw_token);

    let user = users::verify_email(&state.pool, &email, &digest, &timestamp::now())
        .await?
        .ok_or_else(|| ServerError::BadRequest("Invalid user or verification token.".to_string()))?;

    tracing::info!(user_id = %user.id, "Email verified");
    issue_session(&state, user)
}

/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse<User>>> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ServerError::BadRequest(
            "Please provide email and password!".to_string(),
        ));
    };

    let credentials = match normalize_email(&email) {
        Ok(email) => users::get_credentials_by_email(&state.pool, &email).await?,
        Err(_) => None,
    };

    let Some(credentials) = credentials else {
        return Err(ServerError::Auth(INVALID_CREDENTIALS.to_string()));
    };

    if !state
        .auth_service
        .verify_password(&password, &credentials.password_hash)?
    {
        return Err(ServerError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    if !credentials.user.is_verified {
        return Err(ServerError::Auth(
            "Please verify your email address before logging in.".to_string(),
        ));
    }

    tracing::info!(user_id = %credentials.user.id, "User logged in");
    issue_session(&state, credentials.user)
}

/// POST /api/v1/users/forgot-password
///
/// Responds the same way whether or not the email belongs to an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<EmailRequest>,
) -> Result<Json<MessageResponse>> {
    let email = required_email(body.email)?;
    let token = tokens::issue(state.config.auth.password_reset_minutes);

    if !users::set_password_reset(&state.pool, &email, &token.stored).await? {
        tracing::debug!("Password reset requested for unknown email");
        return Ok(envelope::message(RESET_SENT));
    }

    let mail = Mail {
        from: state.config.mail.from.clone(),
        to: email.clone(),
        subject: format!(
            "Your password reset token (valid for {} minutes)",
            state.config.auth.password_reset_minutes
        ),
        body: format!(
            "Forgot your password? Post your new password to this url.\n{}\nIf you didn't request a reset, please ignore this email.",
            link(&state, "reset-password", &token.raw)
        ),
    };

    if let Err(e) = state.mailer.send(&mail).await {
        users::clear_password_reset(&state.pool, &email).await?;
        return Err(ServerError::Mail(e.to_string()));
    }

    Ok(envelope::message(RESET_SENT))
}

/// POST /api/v1/users/reset-password/:token
pub async fn reset_password(
    State(state): State<AppState>,
    Path(raw_token): Path<String>,
    JsonBody(body): JsonBody<ResetPasswordRequest>,
) -> Result<Json<TokenResponse<User>>> {
    let password = body
        .password
        .ok_or_else(|| ServerError::BadRequest("Please provide a new password.".to_string()))?;
    validate_password(&password)?;

    let password_hash = state.auth_service.hash_password(&password)?;
    let user = users::reset_password(
        &state.pool,
        &tokens::digest(&raw_token),
        &password_hash,
        &timestamp::now(),
    )
    .await?
    .ok_or_else(|| ServerError::BadRequest("Token is invalid or has expired.".to_string()))?;

    tracing::info!(user_id = %user.id, "Password reset");
    issue_session(&state, user)
}

/// GET /api/v1/users/me
pub async fn me(user: AuthenticatedUser) -> Json<Envelope<User>> {
    envelope::record("user", user.0)
}
