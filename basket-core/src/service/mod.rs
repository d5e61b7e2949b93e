//! Business logic layer

pub mod address;
pub mod cart;
pub mod catalog;
pub mod identity;
pub mod location;
pub mod order;
pub mod wishlist;

pub use address::AddressService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use identity::{IdentityService, LoginResult};
pub use location::LocationService;
pub use order::OrderService;
pub use wishlist::WishlistService;

use crate::domain::{StringUuid, User};
use crate::error::{AppError, Result};
use crate::repository::UserRepository;

/// Load the account behind a self-scoped request. The gate already resolved it,
/// so a miss here means it was deleted in between.
pub(crate) async fn load_user<U: UserRepository + ?Sized>(
    repo: &U,
    user_id: StringUuid,
) -> Result<User> {
    repo.find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
