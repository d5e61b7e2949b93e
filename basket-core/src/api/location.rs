//! Delivery location handlers

use crate::api::{MessageResponse, SuccessResponse, ValidatedJson};
use crate::domain::UpsertLocationInput;
use crate::error::Result;
use crate::middleware::AdminUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let locations = state.location_service().list().await?;
    Ok(Json(SuccessResponse::new(locations)))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(province): Path<String>,
) -> Result<impl IntoResponse> {
    let location = state.location_service().get(&province).await?;
    Ok(Json(SuccessResponse::new(location)))
}

/// Create or replace the cities of a province
pub async fn upsert<S: HasServices>(
    State(state): State<S>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpsertLocationInput>,
) -> Result<impl IntoResponse> {
    let location = state.location_service().upsert(input).await?;
    Ok(Json(SuccessResponse::new(location)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    _admin: AdminUser,
    Path(province): Path<String>,
) -> Result<impl IntoResponse> {
    state.location_service().delete(&province).await?;
    Ok(Json(MessageResponse::new("Location removed")))
}
