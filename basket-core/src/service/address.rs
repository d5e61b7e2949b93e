//! Shipping address book

use super::load_user;
use crate::domain::{AddressInput, ShippingAddress, StringUuid, UpdateAddressInput};
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use std::sync::Arc;
use validator::Validate;

fn address_not_found() -> AppError {
    AppError::NotFound("Address not found".to_string())
}

pub struct AddressService<U: UserRepository> {
    repo: Arc<U>,
}

impl<U: UserRepository> AddressService<U> {
    pub fn new(repo: Arc<U>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user_id: StringUuid) -> Result<Vec<ShippingAddress>> {
        Ok(load_user(self.repo.as_ref(), user_id).await?.shipping_addresses)
    }

    pub async fn add(&self, user_id: StringUuid, input: AddressInput) -> Result<Vec<ShippingAddress>> {
        input.validate()?;
        let mut user = load_user(self.repo.as_ref(), user_id).await?;
        user.add_address(input);
        Ok(self.repo.save(&user).await?.shipping_addresses)
    }

    pub async fn update(
        &self,
        user_id: StringUuid,
        address_id: StringUuid,
        input: UpdateAddressInput,
    ) -> Result<Vec<ShippingAddress>> {
        input.validate()?;
        let mut user = load_user(self.repo.as_ref(), user_id).await?;
        if !user.update_address(address_id, input) {
            return Err(address_not_found());
        }
        Ok(self.repo.save(&user).await?.shipping_addresses)
    }

    pub async fn remove(&self, user_id: StringUuid, address_id: StringUuid) -> Result<Vec<ShippingAddress>> {
        let mut user = load_user(self.repo.as_ref(), user_id).await?;
        if !user.remove_address(address_id) {
            return Err(address_not_found());
        }
        Ok(self.repo.save(&user).await?.shipping_addresses)
    }
}
