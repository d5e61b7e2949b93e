//! Delivery location repository

use crate::domain::{Location, UpsertLocationInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Location>>;
    async fn find_by_province(&self, province: &str) -> Result<Option<Location>>;
    /// Insert or replace the cities of a province
    async fn upsert(&self, input: &UpsertLocationInput) -> Result<Location>;
    async fn delete(&self, province: &str) -> Result<()>;
}

pub struct LocationRepositoryImpl {
    pool: MySqlPool,
}

impl LocationRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for LocationRepositoryImpl {
    async fn list(&self) -> Result<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            "SELECT province, cities, updated_at FROM locations ORDER BY province",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }

    async fn find_by_province(&self, province: &str) -> Result<Option<Location>> {
        let location = sqlx::query_as::<_, Location>(
            "SELECT province, cities, updated_at FROM locations WHERE province = ?",
        )
        .bind(province)
        .fetch_optional(&self.pool)
        .await?;

        Ok(location)
    }

    async fn upsert(&self, input: &UpsertLocationInput) -> Result<Location> {
        sqlx::query(
            r#"
            INSERT INTO locations (province, cities, updated_at)
            VALUES (?, ?, NOW())
            ON DUPLICATE KEY UPDATE cities = VALUES(cities), updated_at = NOW()
            "#,
        )
        .bind(&input.province)
        .bind(Json(&input.cities))
        .execute(&self.pool)
        .await?;

        self.find_by_province(&input.province)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to upsert location")))
    }

    async fn delete(&self, province: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM locations WHERE province = ?")
            .bind(province)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Location not found".to_string()));
        }

        Ok(())
    }
}
