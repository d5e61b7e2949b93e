//! Catalog domain: products, reviews and listing filters

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use validator::{Validate, ValidationError};

lazy_static::lazy_static! {
    pub static ref SLUG_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    static ref NON_SLUG_CHARS: regex::Regex = regex::Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Validate slug format (lowercase alphanumeric with hyphens)
fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_slug")
            .with_message("Slug must be lowercase letters, digits and hyphens".into()))
    }
}

/// Derive a URL slug from a product name
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Customer review, owned by exactly one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: StringUuid,
    pub user_id: StringUuid,
    /// Author name at the time of review
    pub name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: StringUuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    /// Reference to the stored product image
    pub image: String,
    pub brand: String,
    pub category: String,
    pub count_in_stock: i32,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub rating: f64,
    pub num_reviews: i32,
    #[sqlx(json)]
    pub reviews: Vec<Review>,
    #[serde(skip)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Product {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            price: 0.0,
            original_price: None,
            image: String::new(),
            brand: String::new(),
            category: String::new(),
            count_in_stock: 0,
            tags: Vec::new(),
            is_featured: false,
            weight: None,
            weight_unit: None,
            rating: 0.0,
            num_reviews: 0,
            reviews: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Product {
    pub fn on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    pub fn has_review_by(&self, user_id: StringUuid) -> bool {
        self.reviews.iter().any(|r| r.user_id == user_id)
    }

    /// Append a review and recompute the aggregates over the full collection.
    pub fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.recompute_rating();
    }

    pub fn recompute_rating(&mut self) {
        self.num_reviews = self.reviews.len() as i32;
        self.rating = if self.reviews.is_empty() {
            0.0
        } else {
            let total: i64 = self.reviews.iter().map(|r| r.rating as i64).sum();
            total as f64 / self.reviews.len() as f64
        };
    }

    pub fn apply_update(&mut self, input: UpdateProductInput) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(slug) = input.slug {
            self.slug = slug;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(original_price) = input.original_price {
            self.original_price = original_price;
        }
        if let Some(image) = input.image {
            self.image = image;
        }
        if let Some(brand) = input.brand {
            self.brand = brand;
        }
        if let Some(category) = input.category {
            self.category = category;
        }
        if let Some(count_in_stock) = input.count_in_stock {
            self.count_in_stock = count_in_stock;
        }
        if let Some(tags) = input.tags {
            self.tags = tags;
        }
        if let Some(is_featured) = input.is_featured {
            self.is_featured = is_featured;
        }
        if let Some(weight) = input.weight {
            self.weight = weight;
        }
        if let Some(weight_unit) = input.weight_unit {
            self.weight_unit = Some(weight_unit);
        }
    }
}

/// Product as returned by the API, with derived fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub on_sale: bool,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let on_sale = product.on_sale();
        Self { product, on_sale }
    }
}

/// Compact product info embedded in cart and wishlist responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: StringUuid,
    pub name: String,
    pub slug: String,
    pub price: f64,
    pub image: String,
    pub count_in_stock: i32,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            slug: p.slug.clone(),
            price: p.price,
            image: p.image.clone(),
            count_in_stock: p.count_in_stock,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255, message = "Product name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub price: f64,
    #[validate(range(exclusive_min = 0.0, message = "Original price must be positive"))]
    pub original_price: Option<f64>,
    #[validate(length(min = 1, message = "Image URL is required"))]
    pub image: String,
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(range(min = 0, message = "Stock count cannot be negative"))]
    pub count_in_stock: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[validate(range(exclusive_min = 0.0, message = "Weight must be positive"))]
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
}

impl CreateProductInput {
    pub fn into_product(self, slug: String) -> Product {
        Product {
            name: self.name,
            slug,
            description: self.description,
            price: self.price,
            original_price: self.original_price,
            image: self.image,
            brand: self.brand,
            category: self.category,
            count_in_stock: self.count_in_stock,
            tags: self.tags,
            is_featured: self.is_featured,
            weight: self.weight,
            weight_unit: self.weight_unit,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 255, message = "Product name cannot be empty"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub price: Option<f64>,
    // None keeps the stored value, Some(None) clears it
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(exclusive_min = 0.0, message = "Original price must be positive"))]
    pub original_price: Option<Option<f64>>,
    #[validate(length(min = 1, message = "Image URL cannot be empty"))]
    pub image: Option<String>,
    #[validate(length(min = 1, message = "Brand cannot be empty"))]
    pub brand: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    #[validate(range(min = 0, message = "Stock count cannot be negative"))]
    pub count_in_stock: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(exclusive_min = 0.0, message = "Weight must be positive"))]
    pub weight: Option<Option<f64>>,
    pub weight_unit: Option<String>,
}

/// Map an explicit JSON `null` to `Some(None)`; an absent key stays `None` via `default`
fn deserialize_nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SubmitReviewInput {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, max = 2000, message = "Comment is required"))]
    pub comment: String,
}

impl SubmitReviewInput {
    pub fn normalized(mut self) -> Self {
        self.comment = self.comment.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
    Rating,
    Name,
    NumReviews,
}

impl SortField {
    /// Column name in the products table
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Price => "price",
            SortField::Rating => "rating",
            SortField::Name => "name",
            SortField::NumReviews => "num_reviews",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Catalog listing query string
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductListQuery {
    pub category: Option<String>,
    /// Comma-separated brand names
    pub brand: Option<String>,
    /// Comma-separated tags, any-of
    pub tags: Option<String>,
    #[serde(rename = "price.gte")]
    #[validate(range(min = 0.0, message = "price.gte cannot be negative"))]
    pub price_gte: Option<f64>,
    #[serde(rename = "price.lte")]
    #[validate(range(min = 0.0, message = "price.lte cannot be negative"))]
    pub price_lte: Option<f64>,
    #[serde(rename = "rating.gte")]
    #[validate(range(min = 0.0, max = 5.0, message = "rating.gte must be between 0 and 5"))]
    pub rating_gte: Option<f64>,
    #[serde(rename = "onSale")]
    pub on_sale: Option<bool>,
    pub sort: Option<SortField>,
    pub order: Option<SortDirection>,
}

impl ProductListQuery {
    pub fn into_filter(self) -> ProductFilter {
        ProductFilter {
            category: self.category.filter(|c| !c.trim().is_empty()),
            brands: split_list(self.brand.as_deref()),
            tags: split_list(self.tags.as_deref()),
            price_gte: self.price_gte,
            price_lte: self.price_lte,
            min_rating: self.rating_gte,
            on_sale: self.on_sale,
            sort_field: self.sort.unwrap_or_default(),
            sort_direction: self.order.unwrap_or_default(),
        }
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Conjunctive catalog filter; every present dimension must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brands: Vec<String>,
    pub tags: Vec<String>,
    pub price_gte: Option<f64>,
    pub price_lte: Option<f64>,
    pub min_rating: Option<f64>,
    pub on_sale: Option<bool>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
            return false;
        }
        if !self.tags.is_empty() && !product.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        if self.price_gte.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.price_lte.is_some_and(|max| product.price > max) {
            return false;
        }
        if self.min_rating.is_some_and(|min| product.rating < min) {
            return false;
        }
        if let Some(on_sale) = self.on_sale {
            if product.on_sale() != on_sale {
                return false;
            }
        }
        true
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ordering = match self.sort_field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Rating => a.rating.total_cmp(&b.rating),
            SortField::Name => a.name.cmp(&b.name),
            SortField::NumReviews => a.num_reviews.cmp(&b.num_reviews),
        };
        match self.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Filter and sort an in-memory product set
    pub fn apply(&self, products: impl IntoIterator<Item = Product>) -> Vec<Product> {
        let mut matched: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(|a, b| self.compare(a, b));
        matched
    }
}
