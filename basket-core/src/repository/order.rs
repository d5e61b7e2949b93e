//! Order repository

use super::stale_write;
use crate::domain::{Order, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<Order>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Order>>;
    async fn list_by_user(&self, user_id: StringUuid) -> Result<Vec<Order>>;
    async fn list_all(&self) -> Result<Vec<Order>>;
    /// Persist status/payment changes if the version is unchanged
    async fn save(&self, order: &Order) -> Result<Order>;
}

pub struct OrderRepositoryImpl {
    pool: MySqlPool,
}

impl OrderRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for OrderRepositoryImpl {
    async fn create(&self, order: &Order) -> Result<Order> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, order_items, shipping_address, payment_method, items_price,
                                tax_price, shipping_price, total_price, is_paid, paid_at, status, version,
                                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, NOW(), NOW())
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(Json(&order.order_items))
        .bind(Json(&order.shipping_address))
        .bind(&order.payment_method)
        .bind(order.items_price)
        .bind(order.tax_price)
        .bind(order.shipping_price)
        .bind(order.total_price)
        .bind(order.is_paid)
        .bind(order.paid_at)
        .bind(order.status)
        .execute(&self.pool)
        .await?;

        self.find_by_id(order.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create order")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, order_items, shipping_address, payment_method, items_price, tax_price,
                   shipping_price, total_price, is_paid, paid_at, status, version, created_at, updated_at
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn list_by_user(&self, user_id: StringUuid) -> Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, order_items, shipping_address, payment_method, items_price, tax_price,
                   shipping_price, total_price, is_paid, paid_at, status, version, created_at, updated_at
            FROM orders
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, order_items, shipping_address, payment_method, items_price, tax_price,
                   shipping_price, total_price, is_paid, paid_at, status, version, created_at, updated_at
            FROM orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn save(&self, order: &Order) -> Result<Order> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?, is_paid = ?, paid_at = ?, version = version + 1, updated_at = NOW()
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(order.status)
        .bind(order.is_paid)
        .bind(order.paid_at)
        .bind(order.id)
        .bind(order.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists = self.find_by_id(order.id).await?.is_some();
            return Err(stale_write(exists, "Order"));
        }

        self.find_by_id(order.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }
}
