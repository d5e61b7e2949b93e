//! Admin identity management handlers

use crate::api::{IdPath, MessageResponse, SuccessResponse, ValidatedJson};
use crate::domain::AdminUpdateUserInput;
use crate::error::Result;
use crate::middleware::AdminUser;
use crate::state::HasServices;
use axum::{extract::State, response::IntoResponse, Json};

/// List all accounts
pub async fn list_users<S: HasServices>(
    State(state): State<S>,
    _admin: AdminUser,
) -> Result<impl IntoResponse> {
    let users = state.identity_service().list().await?;
    Ok(Json(SuccessResponse::new(users)))
}

pub async fn get_user<S: HasServices>(
    State(state): State<S>,
    _admin: AdminUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse> {
    let user = state.identity_service().get(id).await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// Update name, email or role of any account
pub async fn update_user<S: HasServices>(
    State(state): State<S>,
    AdminUser(admin): AdminUser,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<AdminUpdateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state.identity_service().admin_update(id, input).await?;
    tracing::info!(admin_id = %admin.id, user_id = %id, "Account updated by admin");
    Ok(Json(SuccessResponse::new(user)))
}

pub async fn delete_user<S: HasServices>(
    State(state): State<S>,
    AdminUser(admin): AdminUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse> {
    state.identity_service().delete(id).await?;
    tracing::info!(admin_id = %admin.id, user_id = %id, "Account removed by admin");
    Ok(Json(MessageResponse::new("User removed")))
}
