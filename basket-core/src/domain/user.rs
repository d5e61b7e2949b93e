//! Identity domain: accounts, roles and the sub-documents they own

use super::common::{normalize_email, StringUuid};
use super::product::ProductSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Account role. Authorization decisions match on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        match self {
            Role::Admin => true,
            Role::User => false,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for Role {
    fn decode(
        value: sqlx::mysql::MySqlValueRef<'r>,
    ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let s: String = sqlx::Decode::<'r, sqlx::MySql>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl sqlx::Type<sqlx::MySql> for Role {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<u8>,
    ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&self.to_string(), buf)
    }
}

/// One cart line; at most one per product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: StringUuid,
    pub quantity: i32,
}

/// Shipping address owned by an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub id: StringUuid,
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Account entity. The credential hash is deliberately not part of it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: StringUuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[sqlx(json)]
    pub cart: Vec<CartItem>,
    #[sqlx(json)]
    pub wishlist: Vec<StringUuid>,
    #[sqlx(json)]
    pub shipping_addresses: Vec<ShippingAddress>,
    /// Optimistic concurrency token
    #[serde(skip)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            email: String::new(),
            role: Role::User,
            cart: Vec::new(),
            wishlist: Vec::new(),
            shipping_addresses: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl User {
    /// Replace the quantity of an existing line, or append a new one.
    pub fn upsert_cart_item(&mut self, product_id: StringUuid, quantity: i32) {
        match self.cart.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => item.quantity = quantity,
            None => self.cart.push(CartItem {
                product_id,
                quantity,
            }),
        }
    }

    /// Returns whether a line was removed
    pub fn remove_cart_item(&mut self, product_id: StringUuid) -> bool {
        let before = self.cart.len();
        self.cart.retain(|item| item.product_id != product_id);
        self.cart.len() != before
    }

    /// Returns `false` when the product was already wishlisted
    pub fn add_to_wishlist(&mut self, product_id: StringUuid) -> bool {
        if self.wishlist.contains(&product_id) {
            return false;
        }
        self.wishlist.push(product_id);
        true
    }

    pub fn remove_from_wishlist(&mut self, product_id: StringUuid) -> bool {
        let before = self.wishlist.len();
        self.wishlist.retain(|id| *id != product_id);
        self.wishlist.len() != before
    }

    pub fn add_address(&mut self, input: AddressInput) -> StringUuid {
        let address = ShippingAddress {
            id: StringUuid::new_v4(),
            full_name: input.full_name,
            phone: input.phone,
            address_line1: input.address_line1,
            address_line2: input.address_line2,
            city: input.city,
            postal_code: input.postal_code,
            country: input.country,
            is_default: input.is_default.unwrap_or(false),
        };
        let id = address.id;
        if address.is_default {
            self.clear_default_address();
        }
        self.shipping_addresses.push(address);
        id
    }

    /// Returns `false` when no address with that id exists
    pub fn update_address(&mut self, address_id: StringUuid, input: UpdateAddressInput) -> bool {
        if !self.shipping_addresses.iter().any(|a| a.id == address_id) {
            return false;
        }
        if input.is_default == Some(true) {
            self.clear_default_address();
        }
        if let Some(address) = self
            .shipping_addresses
            .iter_mut()
            .find(|a| a.id == address_id)
        {
            if let Some(full_name) = input.full_name {
                address.full_name = full_name;
            }
            if let Some(phone) = input.phone {
                address.phone = phone;
            }
            if let Some(line1) = input.address_line1 {
                address.address_line1 = line1;
            }
            if let Some(line2) = input.address_line2 {
                address.address_line2 = Some(line2);
            }
            if let Some(city) = input.city {
                address.city = city;
            }
            if let Some(postal_code) = input.postal_code {
                address.postal_code = postal_code;
            }
            if let Some(country) = input.country {
                address.country = country;
            }
            if let Some(is_default) = input.is_default {
                address.is_default = is_default;
            }
        }
        true
    }

    pub fn remove_address(&mut self, address_id: StringUuid) -> bool {
        let before = self.shipping_addresses.len();
        self.shipping_addresses.retain(|a| a.id != address_id);
        self.shipping_addresses.len() != before
    }

    fn clear_default_address(&mut self) {
        for address in &mut self.shipping_addresses {
            address.is_default = false;
        }
    }
}

/// Account row together with its credential hash (login / password change only)
#[derive(Debug, Clone, FromRow)]
pub struct UserWithCredential {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Public account view returned by register/login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: StringUuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Repository input for a new account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl RegisterInput {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

impl std::fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "A valid email is required to login"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: Option<String>,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
}

impl UpdateProfileInput {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.email = self.email.map(|e| normalize_email(&e));
        self
    }
}

#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminUpdateUserInput {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: Option<String>,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl AdminUpdateUserInput {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.email = self.email.map(|e| normalize_email(&e));
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Address line 1 is required"))]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[serde(default)]
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressInput {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, message = "Phone cannot be empty"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Address line 1 cannot be empty"))]
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: Option<String>,
    #[validate(length(min = 1, message = "Postal code cannot be empty"))]
    pub postal_code: Option<String>,
    #[validate(length(min = 1, message = "Country cannot be empty"))]
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    pub product_id: StringUuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistInput {
    pub product_id: StringUuid,
}

/// Cart line with the referenced product resolved; `product` is `None` once
/// the product has been removed from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: StringUuid,
    pub quantity: i32,
    pub product: Option<ProductSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntryView {
    pub product_id: StringUuid,
    pub product: Option<ProductSummary>,
}
