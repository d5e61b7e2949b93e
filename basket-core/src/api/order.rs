//! Order handlers

use crate::api::{IdPath, SuccessResponse, ValidatedJson};
use crate::domain::{CreateOrderInput, UpdateOrderStatusInput};
use crate::error::Result;
use crate::middleware::{AdminUser, AuthUser};
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// POST /api/v1/orders
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateOrderInput>,
) -> Result<impl IntoResponse> {
    let order = state.order_service().create(auth.id, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(order))))
}

/// GET /api/v1/orders (admin)
pub async fn list_all<S: HasServices>(
    State(state): State<S>,
    _admin: AdminUser,
) -> Result<impl IntoResponse> {
    let orders = state.order_service().list_all().await?;
    Ok(Json(SuccessResponse::new(orders)))
}

/// GET /api/v1/orders/myorders
pub async fn list_mine<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let orders = state.order_service().list_mine(auth.id).await?;
    Ok(Json(SuccessResponse::new(orders)))
}

/// GET /api/v1/orders/{id}
pub async fn get<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse> {
    let order = state.order_service().get_for(id, auth.id, auth.role).await?;
    Ok(Json(SuccessResponse::new(order)))
}

/// PUT /api/v1/orders/{id}/status (admin)
pub async fn update_status<S: HasServices>(
    State(state): State<S>,
    _admin: AdminUser,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateOrderStatusInput>,
) -> Result<impl IntoResponse> {
    let order = state.order_service().update_status(id, input).await?;
    Ok(Json(SuccessResponse::new(order)))
}
