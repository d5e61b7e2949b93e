//! Order domain: checkout snapshots and fulfilment status

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Fulfilment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(OrderStatus::Processing),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for OrderStatus {
    fn decode(
        value: sqlx::mysql::MySqlValueRef<'r>,
    ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let s: String = sqlx::Decode::<'r, sqlx::MySql>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl sqlx::Type<sqlx::MySql> for OrderStatus {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for OrderStatus {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<u8>,
    ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&self.to_string(), buf)
    }
}

/// Line item copied into the order at checkout; never re-read from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrderItem {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub image: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    /// Catalog product this line was bought from
    pub product: StringUuid,
}

/// Shipping address copied into the order at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSnapshot {
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: StringUuid,
    pub user_id: StringUuid,
    #[sqlx(json)]
    pub order_items: Vec<OrderItem>,
    #[sqlx(json)]
    pub shipping_address: ShippingSnapshot,
    pub payment_method: String,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    #[serde(skip)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[validate(
        length(min = 1, message = "Order must contain at least one item."),
        nested
    )]
    pub order_items: Vec<OrderItem>,
    #[validate(nested)]
    pub shipping_address: ShippingSnapshot,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
    #[validate(range(min = 0.0, message = "Items price cannot be negative"))]
    pub items_price: f64,
    #[validate(range(min = 0.0, message = "Tax price cannot be negative"))]
    pub tax_price: f64,
    #[validate(range(min = 0.0, message = "Shipping price cannot be negative"))]
    pub shipping_price: f64,
    #[validate(range(min = 0.0, message = "Total price cannot be negative"))]
    pub total_price: f64,
}

impl CreateOrderInput {
    /// Build a new order owned by `user_id` with status Processing and unpaid.
    pub fn into_order(self, user_id: StringUuid) -> Order {
        let now = Utc::now();
        Order {
            id: StringUuid::new_v4(),
            user_id,
            order_items: self.order_items,
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
            items_price: self.items_price,
            tax_price: self.tax_price,
            shipping_price: self.shipping_price,
            total_price: self.total_price,
            is_paid: false,
            paid_at: None,
            status: OrderStatus::Processing,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateOrderStatusInput {
    pub status: OrderStatus,
}

/// Owner reference included in admin order listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOwner {
    pub id: StringUuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub user: Option<OrderOwner>,
}
