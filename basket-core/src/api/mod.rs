//! REST API handlers and shared response types

pub mod address;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod extract;
pub mod health;
pub mod location;
pub mod metrics;
pub mod order;
pub mod product;
pub mod user;
pub mod wishlist;

use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

pub use extract::{IdPath, ValidatedJson, ValidatedQuery};

/// Success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Message response (for delete, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// GET /
pub async fn welcome() -> impl IntoResponse {
    Json(MessageResponse::new("Welcome to the Gecko-Basket API!"))
}
