//! Cart business logic

use super::load_user;
use crate::domain::{
    AddToCartInput, CartLineView, ProductSummary, StringUuid, User,
};
use crate::error::{AppError, Result};
use crate::repository::{ProductRepository, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

pub struct CartService<U: UserRepository, P: ProductRepository> {
    user_repo: Arc<U>,
    product_repo: Arc<P>,
}

impl<U: UserRepository, P: ProductRepository> CartService<U, P> {
    pub fn new(user_repo: Arc<U>, product_repo: Arc<P>) -> Self {
        Self {
            user_repo,
            product_repo,
        }
    }

    pub async fn get(&self, user_id: StringUuid) -> Result<Vec<CartLineView>> {
        let user = load_user(self.user_repo.as_ref(), user_id).await?;
        self.populate(&user).await
    }

    /// Upsert a line: an existing line for the product gets the new quantity.
    pub async fn add(&self, user_id: StringUuid, input: AddToCartInput) -> Result<Vec<CartLineView>> {
        input.validate()?;

        if self.product_repo.find_by_id(input.product_id).await?.is_none() {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        let mut user = load_user(self.user_repo.as_ref(), user_id).await?;
        user.upsert_cart_item(input.product_id, input.quantity);
        let user = self.user_repo.save(&user).await?;

        self.populate(&user).await
    }

    /// Removing a product that is not in the cart leaves it unchanged.
    pub async fn remove(&self, user_id: StringUuid, product_id: StringUuid) -> Result<Vec<CartLineView>> {
        let mut user = load_user(self.user_repo.as_ref(), user_id).await?;
        if user.remove_cart_item(product_id) {
            user = self.user_repo.save(&user).await?;
        }
        self.populate(&user).await
    }

    async fn populate(&self, user: &User) -> Result<Vec<CartLineView>> {
        let ids: Vec<StringUuid> = user.cart.iter().map(|item| item.product_id).collect();
        let products: HashMap<StringUuid, ProductSummary> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.product_repo
                .find_by_ids(&ids)
                .await?
                .iter()
                .map(|p| (p.id, ProductSummary::from(p)))
                .collect()
        };

        Ok(user
            .cart
            .iter()
            .map(|item| CartLineView {
                product_id: item.product_id,
                quantity: item.quantity,
                product: products.get(&item.product_id).cloned(),
            })
            .collect())
    }
}
