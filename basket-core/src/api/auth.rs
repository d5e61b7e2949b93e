//! Registration and login handlers

use crate::api::ValidatedJson;
use crate::domain::{LoginInput, RegisterInput, UserSummary};
use crate::error::Result;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// POST /api/v1/auth/register
pub async fn register<S: HasServices>(
    State(state): State<S>,
    ValidatedJson(input): ValidatedJson<RegisterInput>,
) -> Result<impl IntoResponse> {
    let user = state.identity_service().register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully!".to_string(),
            user,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login<S: HasServices>(
    State(state): State<S>,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> Result<impl IntoResponse> {
    let result = state.identity_service().login(input).await?;
    Ok(Json(result))
}
