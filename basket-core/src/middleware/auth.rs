//! Access control gate
//!
//! `AuthUser` authenticates the bearer token and resolves the identity it
//! names. `AdminUser` additionally requires the admin role. Both run before
//! any body extractor, so an unauthenticated request is rejected before its
//! payload is looked at.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::errors::ErrorKind;

use crate::domain::{Role, StringUuid, User};
use crate::error::AppError;
use crate::state::HasServices;

/// Authenticated identity, resolved from the store on every request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: StringUuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Authenticated identity holding the admin role
#[derive(Debug, Clone, PartialEq)]
pub struct AdminUser(pub AuthUser);

/// Gate failures
#[derive(Debug)]
pub enum AuthError {
    /// No bearer credentials on the request
    MissingToken,
    /// Malformed, expired or wrongly signed token
    InvalidToken,
    /// Token is valid but its identity no longer exists
    UnknownIdentity,
    /// Authenticated, but not an admin
    AdminOnly,
    /// Identity lookup failed
    Backend(AppError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => AppError::Unauthorized("Not authorized, no token".to_string()),
            AuthError::InvalidToken => {
                AppError::Unauthorized("Not authorized, token failed".to_string())
            }
            AuthError::UnknownIdentity => {
                AppError::Unauthorized("No user found with this id".to_string())
            }
            AuthError::AdminOnly => AppError::Forbidden("Access denied. Admins only.".to_string()),
            AuthError::Backend(e) => e,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

/// A header that is present but not in the Bearer scheme counts as no token.
fn has_bearer_scheme(parts: &Parts) -> bool {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.get(..6))
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("bearer"))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !has_bearer_scheme(parts) {
            return Err(AuthError::MissingToken);
        }

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        let claims = state
            .jwt_manager()
            .verify_session_token(bearer.token())
            .map_err(|e| {
                match &e {
                    AppError::Jwt(jwt) if matches!(jwt.kind(), ErrorKind::ExpiredSignature) => {
                        tracing::debug!("Session token expired");
                    }
                    _ => tracing::debug!("Session token rejected: {}", e),
                }
                AuthError::InvalidToken
            })?;
        let user_id = claims.user_id().map_err(|_| AuthError::InvalidToken)?;

        let user = state
            .identity_service()
            .find(user_id)
            .await
            .map_err(AuthError::Backend)?
            .ok_or(AuthError::UnknownIdentity)?;

        Ok(AuthUser::from(user))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Admin => Ok(AdminUser(user)),
            Role::User => Err(AuthError::AdminOnly),
        }
    }
}
