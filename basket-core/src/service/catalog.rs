//! Catalog business logic: products and reviews

use crate::domain::{
    slugify, CreateProductInput, ProductFilter, ProductView, Review, StringUuid,
    SubmitReviewInput, UpdateProductInput,
};
use crate::error::{AppError, FieldError, Result};
use crate::repository::ProductRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn duplicate_slug(slug: &str) -> AppError {
    AppError::Conflict(format!("Product with slug '{}' already exists", slug))
}

pub struct CatalogService<P: ProductRepository> {
    repo: Arc<P>,
}

impl<P: ProductRepository> CatalogService<P> {
    pub fn new(repo: Arc<P>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<ProductView>> {
        let products = self.repo.list(filter).await?;
        Ok(products.into_iter().map(ProductView::from).collect())
    }

    pub async fn get(&self, id: StringUuid) -> Result<ProductView> {
        self.repo
            .find_by_id(id)
            .await?
            .map(ProductView::from)
            .ok_or_else(product_not_found)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<ProductView> {
        self.repo
            .find_by_slug(slug)
            .await?
            .map(ProductView::from)
            .ok_or_else(product_not_found)
    }

    pub async fn create(&self, input: CreateProductInput) -> Result<ProductView> {
        input.validate()?;

        let slug = match &input.slug {
            Some(slug) => slug.clone(),
            None => slugify(&input.name),
        };
        if slug.is_empty() {
            return Err(AppError::Validation(vec![FieldError::new(
                "slug",
                "Slug could not be derived from the product name",
            )]));
        }

        if self.repo.find_by_slug(&slug).await?.is_some() {
            return Err(duplicate_slug(&slug));
        }

        let product = self.repo.create(&input.into_product(slug)).await?;
        info!(product_id = %product.id, slug = %product.slug, "Created product");
        Ok(ProductView::from(product))
    }

    pub async fn update(&self, id: StringUuid, input: UpdateProductInput) -> Result<ProductView> {
        input.validate()?;

        let mut product = self.repo.find_by_id(id).await?.ok_or_else(product_not_found)?;

        if let Some(slug) = &input.slug {
            if slug != &product.slug {
                if let Some(other) = self.repo.find_by_slug(slug).await? {
                    if other.id != product.id {
                        return Err(duplicate_slug(slug));
                    }
                }
            }
        }

        product.apply_update(input);
        let product = self.repo.save(&product).await?;
        Ok(ProductView::from(product))
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.repo.delete(id).await?;
        info!(product_id = %id, "Removed product");
        Ok(())
    }

    /// One review per identity per product; the aggregates are recomputed over all reviews.
    pub async fn submit_review(
        &self,
        product_id: StringUuid,
        reviewer_id: StringUuid,
        reviewer_name: &str,
        input: SubmitReviewInput,
    ) -> Result<ProductView> {
        let input = input.normalized();
        input.validate()?;

        let mut product = self
            .repo
            .find_by_id(product_id)
            .await?
            .ok_or_else(product_not_found)?;

        if product.has_review_by(reviewer_id) {
            return Err(AppError::Conflict("Product already reviewed".to_string()));
        }

        product.push_review(Review {
            id: StringUuid::new_v4(),
            user_id: reviewer_id,
            name: reviewer_name.to_string(),
            rating: input.rating,
            comment: input.comment,
            created_at: Utc::now(),
        });

        let product = self.repo.save(&product).await?;
        metrics::counter!("basket_reviews_submitted_total").increment(1);
        Ok(ProductView::from(product))
    }
}
