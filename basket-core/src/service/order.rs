//! Checkout and order fulfilment

use crate::domain::{
    AdminOrderView, CreateOrderInput, Order, OrderOwner, Role, StringUuid, UpdateOrderStatusInput,
};
use crate::error::{AppError, Result};
use crate::repository::{OrderRepository, UserRepository};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

fn order_not_found() -> AppError {
    AppError::NotFound("Order not found".to_string())
}

pub struct OrderService<O: OrderRepository, U: UserRepository> {
    repo: Arc<O>,
    user_repo: Arc<U>,
}

impl<O: OrderRepository, U: UserRepository> OrderService<O, U> {
    pub fn new(repo: Arc<O>, user_repo: Arc<U>) -> Self {
        Self { repo, user_repo }
    }

    /// Prices, totals and line items are taken from the caller as-is.
    pub async fn create(&self, user_id: StringUuid, input: CreateOrderInput) -> Result<Order> {
        input.validate()?;

        let order = self.repo.create(&input.into_order(user_id)).await?;
        metrics::counter!("basket_orders_created_total").increment(1);
        info!(order_id = %order.id, user_id = %user_id, "Order placed");
        Ok(order)
    }

    pub async fn list_mine(&self, user_id: StringUuid) -> Result<Vec<Order>> {
        self.repo.list_by_user(user_id).await
    }

    /// Every order, each with the owning account's id and name
    pub async fn list_all(&self) -> Result<Vec<AdminOrderView>> {
        let orders = self.repo.list_all().await?;

        let owner_ids: BTreeSet<StringUuid> = orders.iter().map(|o| o.user_id).collect();
        let mut owners: HashMap<StringUuid, OrderOwner> = HashMap::with_capacity(owner_ids.len());
        for id in owner_ids {
            if let Some(user) = self.user_repo.find_by_id(id).await? {
                owners.insert(
                    id,
                    OrderOwner {
                        id,
                        name: user.name,
                    },
                );
            }
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let user = owners.get(&order.user_id).cloned();
                AdminOrderView { order, user }
            })
            .collect())
    }

    /// The owner or an admin may read an order; anyone else sees it as missing.
    pub async fn get_for(&self, id: StringUuid, requester: StringUuid, role: Role) -> Result<Order> {
        let order = self.repo.find_by_id(id).await?.ok_or_else(order_not_found)?;
        match role {
            Role::Admin => Ok(order),
            Role::User if order.user_id == requester => Ok(order),
            Role::User => Err(order_not_found()),
        }
    }

    /// Any status may follow any other.
    pub async fn update_status(&self, id: StringUuid, input: UpdateOrderStatusInput) -> Result<Order> {
        input.validate()?;

        let mut order = self.repo.find_by_id(id).await?.ok_or_else(order_not_found)?;
        let previous = order.status;
        order.status = input.status;
        let order = self.repo.save(&order).await?;

        info!(order_id = %id, from = %previous, to = %order.status, "Order status changed");
        Ok(order)
    }
}
