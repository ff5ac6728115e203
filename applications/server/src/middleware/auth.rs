/// Authentication middleware
use crate::{error::ServerError, state::AppState};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tunehub_core::types::{issued_before_password_change, Role, User};
use tunehub_storage::users;

/// The logged-in user, stored in request extensions by [`protect`]
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Reject callers without the admin role
    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.0.role == Role::Admin {
            Ok(())
        } else {
            Err(ServerError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ))
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware that requires a valid JWT for a user that still exists
///
/// Tokens issued before the user's last password change are refused.
pub async fn protect(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(&request).map(str::to_owned).ok_or_else(|| {
        ServerError::Auth("You are not logged in! Please log in to get access.".to_string())
    })?;

    let claims = state.auth_service.verify_token(&token)?;

    let credentials = users::get_credentials_by_id(&state.pool, &claims.user_id())
        .await?
        .ok_or_else(|| {
            ServerError::Auth(
                "The user belonging to this token does no longer exist.".to_string(),
            )
        })?;

    if issued_before_password_change(claims.iat, credentials.password_changed_at.as_deref()) {
        tracing::debug!(user_id = %credentials.user.id, "Rejecting token issued before password change");
        return Err(ServerError::Auth(
            "User recently changed password! Please log in again.".to_string(),
        ));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser(credentials.user));

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
