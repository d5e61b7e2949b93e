//! Wishlist handlers

use crate::api::{IdPath, SuccessResponse, ValidatedJson};
use crate::domain::AddToWishlistInput;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::HasServices;
use axum::{extract::State, response::IntoResponse, Json};

pub async fn get<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let wishlist = state.wishlist_service().get(auth.id).await?;
    Ok(Json(SuccessResponse::new(wishlist)))
}

pub async fn add<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<AddToWishlistInput>,
) -> Result<impl IntoResponse> {
    let wishlist = state.wishlist_service().add(auth.id, input).await?;
    Ok(Json(SuccessResponse::new(wishlist)))
}

pub async fn remove<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    IdPath(product_id): IdPath,
) -> Result<impl IntoResponse> {
    let wishlist = state.wishlist_service().remove(auth.id, product_id).await?;
    Ok(Json(SuccessResponse::new(wishlist)))
}
