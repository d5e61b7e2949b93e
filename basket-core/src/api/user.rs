//! Own-profile handlers

use crate::api::{MessageResponse, SuccessResponse, ValidatedJson};
use crate::domain::{ChangePasswordInput, UpdateProfileInput};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::HasServices;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /api/v1/users/profile
pub async fn get_profile<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let user = state.identity_service().get(auth.id).await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// PUT /api/v1/users/profile
pub async fn update_profile<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfileInput>,
) -> Result<impl IntoResponse> {
    let user = state.identity_service().update_profile(auth.id, input).await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// PUT /api/v1/users/change-password
pub async fn change_password<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordInput>,
) -> Result<impl IntoResponse> {
    state
        .identity_service()
        .change_password(auth.id, input)
        .await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
