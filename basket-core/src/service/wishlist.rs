//! Wishlist business logic

use super::load_user;
use crate::domain::{AddToWishlistInput, ProductSummary, StringUuid, User, WishlistEntryView};
use crate::error::{AppError, Result};
use crate::repository::{ProductRepository, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

pub struct WishlistService<U: UserRepository, P: ProductRepository> {
    user_repo: Arc<U>,
    product_repo: Arc<P>,
}

impl<U: UserRepository, P: ProductRepository> WishlistService<U, P> {
    pub fn new(user_repo: Arc<U>, product_repo: Arc<P>) -> Self {
        Self {
            user_repo,
            product_repo,
        }
    }

    pub async fn get(&self, user_id: StringUuid) -> Result<Vec<WishlistEntryView>> {
        let user = load_user(self.user_repo.as_ref(), user_id).await?;
        self.populate(&user).await
    }

    /// Idempotent: adding an already wishlisted product is a no-op.
    pub async fn add(
        &self,
        user_id: StringUuid,
        input: AddToWishlistInput,
    ) -> Result<Vec<WishlistEntryView>> {
        input.validate()?;

        if self.product_repo.find_by_id(input.product_id).await?.is_none() {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        let mut user = load_user(self.user_repo.as_ref(), user_id).await?;
        if user.add_to_wishlist(input.product_id) {
            user = self.user_repo.save(&user).await?;
        }
        self.populate(&user).await
    }

    pub async fn remove(
        &self,
        user_id: StringUuid,
        product_id: StringUuid,
    ) -> Result<Vec<WishlistEntryView>> {
        let mut user = load_user(self.user_repo.as_ref(), user_id).await?;
        if user.remove_from_wishlist(product_id) {
            user = self.user_repo.save(&user).await?;
        }
        self.populate(&user).await
    }

    async fn populate(&self, user: &User) -> Result<Vec<WishlistEntryView>> {
        if user.wishlist.is_empty() {
            return Ok(Vec::new());
        }
        let products: HashMap<StringUuid, ProductSummary> = self
            .product_repo
            .find_by_ids(&user.wishlist)
            .await?
            .iter()
            .map(|p| (p.id, ProductSummary::from(p)))
            .collect();

        Ok(user
            .wishlist
            .iter()
            .map(|id| WishlistEntryView {
                product_id: *id,
                product: products.get(id).cloned(),
            })
            .collect())
    }
}
