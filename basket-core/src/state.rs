//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`] so the same router serves
//! the production `AppState` and the in-memory test state.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{LocationRepository, OrderRepository, ProductRepository, UserRepository};
use crate::service::{
    AddressService, CartService, CatalogService, IdentityService, LocationService, OrderService,
    WishlistService,
};

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The user repository type
    type UserRepo: UserRepository;
    /// The product repository type
    type ProductRepo: ProductRepository;
    /// The order repository type
    type OrderRepo: OrderRepository;
    /// The location repository type
    type LocationRepo: LocationRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    fn identity_service(&self) -> &IdentityService<Self::UserRepo>;

    fn address_service(&self) -> &AddressService<Self::UserRepo>;

    fn cart_service(&self) -> &CartService<Self::UserRepo, Self::ProductRepo>;

    fn wishlist_service(&self) -> &WishlistService<Self::UserRepo, Self::ProductRepo>;

    fn catalog_service(&self) -> &CatalogService<Self::ProductRepo>;

    fn order_service(&self) -> &OrderService<Self::OrderRepo, Self::UserRepo>;

    fn location_service(&self) -> &LocationService<Self::LocationRepo>;

    /// Check if the backing store is reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
