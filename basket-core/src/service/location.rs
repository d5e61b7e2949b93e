//! Delivery locations

use crate::domain::{Location, UpsertLocationInput};
use crate::error::{AppError, Result};
use crate::repository::LocationRepository;
use std::sync::Arc;
use validator::Validate;

pub struct LocationService<L: LocationRepository> {
    repo: Arc<L>,
}

impl<L: LocationRepository> LocationService<L> {
    pub fn new(repo: Arc<L>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Location>> {
        self.repo.list().await
    }

    pub async fn get(&self, province: &str) -> Result<Location> {
        self.repo
            .find_by_province(province)
            .await?
            .ok_or_else(|| AppError::NotFound("Location not found".to_string()))
    }

    pub async fn upsert(&self, input: UpsertLocationInput) -> Result<Location> {
        let input = input.normalized();
        input.validate()?;
        self.repo.upsert(&input).await
    }

    pub async fn delete(&self, province: &str) -> Result<()> {
        self.repo.delete(province).await
    }
}
