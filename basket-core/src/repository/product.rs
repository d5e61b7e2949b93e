//! Product repository

use super::{conflict_on_unique, stale_write};
use crate::domain::{Product, ProductFilter, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, original_price, image, brand, category, \
     count_in_stock, tags, is_featured, weight, weight_unit, rating, num_reviews, reviews, version, \
     created_at, updated_at";

fn duplicate_slug(slug: &str) -> String {
    format!("Product with slug '{}' already exists", slug)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Product>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>>;
    async fn find_by_ids(&self, ids: &[StringUuid]) -> Result<Vec<Product>>;
    /// Full matching set, filtered and sorted
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>>;
    /// Write the whole document back if its version is unchanged
    async fn save(&self, product: &Product) -> Result<Product>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct ProductRepositoryImpl {
    pool: MySqlPool,
}

impl ProductRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Append the filter's WHERE and ORDER BY clauses.
fn push_filter(qb: &mut QueryBuilder<'_, MySql>, filter: &ProductFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if !filter.brands.is_empty() {
        qb.push(" AND brand IN (");
        let mut brands = qb.separated(", ");
        for brand in &filter.brands {
            brands.push_bind(brand.clone());
        }
        brands.push_unseparated(")");
    }
    if !filter.tags.is_empty() {
        qb.push(" AND JSON_OVERLAPS(tags, CAST(")
            .push_bind(Json(filter.tags.clone()))
            .push(" AS JSON))");
    }
    if let Some(min) = filter.price_gte {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.price_lte {
        qb.push(" AND price <= ").push_bind(max);
    }
    if let Some(min_rating) = filter.min_rating {
        qb.push(" AND rating >= ").push_bind(min_rating);
    }
    match filter.on_sale {
        Some(true) => {
            qb.push(" AND original_price IS NOT NULL AND original_price > price");
        }
        Some(false) => {
            qb.push(" AND (original_price IS NULL OR original_price <= price)");
        }
        None => {}
    }

    qb.push(" ORDER BY ")
        .push(filter.sort_field.column())
        .push(" ")
        .push(filter.sort_direction.sql())
        .push(", id ASC");
}

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn create(&self, product: &Product) -> Result<Product> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, description, price, original_price, image, brand, category,
                                  count_in_stock, tags, is_featured, weight, weight_unit, rating, num_reviews,
                                  reviews, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, NOW(), NOW())
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(&product.image)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.count_in_stock)
        .bind(Json(&product.tags))
        .bind(product.is_featured)
        .bind(product.weight)
        .bind(&product.weight_unit)
        .bind(product.rating)
        .bind(product.num_reviews)
        .bind(Json(&product.reviews))
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, &duplicate_slug(&product.slug)))?;

        self.find_by_id(product.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create product")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE slug = ?", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn find_by_ids(&self, ids: &[StringUuid]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM products WHERE id IN (",
            PRODUCT_COLUMNS
        ));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let mut qb =
            QueryBuilder::<MySql>::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));
        push_filter(&mut qb, filter);

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn save(&self, product: &Product) -> Result<Product> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, slug = ?, description = ?, price = ?, original_price = ?, image = ?, brand = ?,
                category = ?, count_in_stock = ?, tags = ?, is_featured = ?, weight = ?, weight_unit = ?,
                rating = ?, num_reviews = ?, reviews = ?, version = version + 1, updated_at = NOW()
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(&product.image)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.count_in_stock)
        .bind(Json(&product.tags))
        .bind(product.is_featured)
        .bind(product.weight)
        .bind(&product.weight_unit)
        .bind(product.rating)
        .bind(product.num_reviews)
        .bind(Json(&product.reviews))
        .bind(product.id)
        .bind(product.version)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, &duplicate_slug(&product.slug)))?;

        if result.rows_affected() == 0 {
            let exists = self.find_by_id(product.id).await?.is_some();
            return Err(stale_write(exists, "Product"));
        }

        self.find_by_id(product.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        Ok(())
    }
}
