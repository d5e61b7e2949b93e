//! Cart handlers

use crate::api::{IdPath, SuccessResponse, ValidatedJson};
use crate::domain::AddToCartInput;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::HasServices;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /api/v1/cart
pub async fn get<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let cart = state.cart_service().get(auth.id).await?;
    Ok(Json(SuccessResponse::new(cart)))
}

/// POST /api/v1/cart
///
/// Sets the quantity for the product, replacing any existing line.
pub async fn add<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<AddToCartInput>,
) -> Result<impl IntoResponse> {
    let cart = state.cart_service().add(auth.id, input).await?;
    Ok(Json(SuccessResponse::new(cart)))
}

/// DELETE /api/v1/cart/{productId}
pub async fn remove<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    IdPath(product_id): IdPath,
) -> Result<impl IntoResponse> {
    let cart = state.cart_service().remove(auth.id, product_id).await?;
    Ok(Json(SuccessResponse::new(cart)))
}
