//! Catalog handlers

use crate::api::{IdPath, MessageResponse, SuccessResponse, ValidatedJson, ValidatedQuery};
use crate::domain::{CreateProductInput, ProductListQuery, SubmitReviewInput, UpdateProductInput};
use crate::error::Result;
use crate::middleware::{AdminUser, AuthUser};
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// List products matching every supplied filter
pub async fn list<S: HasServices>(
    State(state): State<S>,
    ValidatedQuery(query): ValidatedQuery<ProductListQuery>,
) -> Result<impl IntoResponse> {
    let filter = query.into_filter();
    let products = state.catalog_service().list(&filter).await?;
    Ok(Json(SuccessResponse::new(products)))
}

/// Get product by ID
pub async fn get<S: HasServices>(
    State(state): State<S>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse> {
    let product = state.catalog_service().get(id).await?;
    Ok(Json(SuccessResponse::new(product)))
}

/// Get product by slug
pub async fn get_by_slug<S: HasServices>(
    State(state): State<S>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state.catalog_service().get_by_slug(&slug).await?;
    Ok(Json(SuccessResponse::new(product)))
}

/// Create product
pub async fn create<S: HasServices>(
    State(state): State<S>,
    AdminUser(admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateProductInput>,
) -> Result<impl IntoResponse> {
    let product = state.catalog_service().create(input).await?;
    tracing::info!(
        admin_id = %admin.id,
        product_id = %product.product.id,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(product))))
}

/// Update product
pub async fn update<S: HasServices>(
    State(state): State<S>,
    _admin: AdminUser,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProductInput>,
) -> Result<impl IntoResponse> {
    let product = state.catalog_service().update(id, input).await?;
    Ok(Json(SuccessResponse::new(product)))
}

/// Delete product
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    _admin: AdminUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse> {
    state.catalog_service().delete(id).await?;
    Ok(Json(MessageResponse::new("Product removed")))
}

/// Submit a review as the calling identity
pub async fn create_review<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<SubmitReviewInput>,
) -> Result<impl IntoResponse> {
    let product = state
        .catalog_service()
        .submit_review(id, auth.id, &auth.name, input)
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(product))))
}
