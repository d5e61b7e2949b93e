//! Shipping address handlers

use crate::api::{IdPath, SuccessResponse, ValidatedJson};
use crate::domain::{AddressInput, UpdateAddressInput};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// GET /api/v1/users/addresses
pub async fn list<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let addresses = state.address_service().list(auth.id).await?;
    Ok(Json(SuccessResponse::new(addresses)))
}

/// POST /api/v1/users/addresses
pub async fn add<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<AddressInput>,
) -> Result<impl IntoResponse> {
    let addresses = state.address_service().add(auth.id, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(addresses))))
}

/// PUT /api/v1/users/addresses/{id}
pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    IdPath(address_id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateAddressInput>,
) -> Result<impl IntoResponse> {
    let addresses = state
        .address_service()
        .update(auth.id, address_id, input)
        .await?;
    Ok(Json(SuccessResponse::new(addresses)))
}

/// DELETE /api/v1/users/addresses/{id}
pub async fn remove<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    IdPath(address_id): IdPath,
) -> Result<impl IntoResponse> {
    let addresses = state.address_service().remove(auth.id, address_id).await?;
    Ok(Json(SuccessResponse::new(addresses)))
}
