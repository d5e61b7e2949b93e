//! Server initialization and routing

use crate::api;
use crate::config::{Config, CorsConfig};
use crate::jwt::JwtManager;
use crate::middleware::{
    normalize_error_response, security_headers_middleware, ObservabilityLayer, SanitizedMakeSpan,
};
use crate::repository::{
    location::LocationRepositoryImpl, order::OrderRepositoryImpl, product::ProductRepositoryImpl,
    user::UserRepositoryImpl,
};
use crate::service::{
    AddressService, CartService, CatalogService, IdentityService, LocationService, OrderService,
    WishlistService,
};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub jwt_manager: JwtManager,
    pub identity_service: Arc<IdentityService<UserRepositoryImpl>>,
    pub address_service: Arc<AddressService<UserRepositoryImpl>>,
    pub cart_service: Arc<CartService<UserRepositoryImpl, ProductRepositoryImpl>>,
    pub wishlist_service: Arc<WishlistService<UserRepositoryImpl, ProductRepositoryImpl>>,
    pub catalog_service: Arc<CatalogService<ProductRepositoryImpl>>,
    pub order_service: Arc<OrderService<OrderRepositoryImpl, UserRepositoryImpl>>,
    pub location_service: Arc<LocationService<LocationRepositoryImpl>>,
}

impl AppState {
    /// Wire repositories and services over one connection pool
    pub fn new(config: Config, db_pool: MySqlPool) -> Self {
        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let product_repo = Arc::new(ProductRepositoryImpl::new(db_pool.clone()));
        let order_repo = Arc::new(OrderRepositoryImpl::new(db_pool.clone()));
        let location_repo = Arc::new(LocationRepositoryImpl::new(db_pool.clone()));

        let jwt_manager = JwtManager::new(config.jwt.clone());

        Self {
            identity_service: Arc::new(IdentityService::new(
                user_repo.clone(),
                jwt_manager.clone(),
            )),
            address_service: Arc::new(AddressService::new(user_repo.clone())),
            cart_service: Arc::new(CartService::new(user_repo.clone(), product_repo.clone())),
            wishlist_service: Arc::new(WishlistService::new(
                user_repo.clone(),
                product_repo.clone(),
            )),
            catalog_service: Arc::new(CatalogService::new(product_repo)),
            order_service: Arc::new(OrderService::new(order_repo, user_repo)),
            location_service: Arc::new(LocationService::new(location_repo)),
            jwt_manager,
            config: Arc::new(config),
            db_pool,
        }
    }
}

/// Implement HasServices trait for production AppState
impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type ProductRepo = ProductRepositoryImpl;
    type OrderRepo = OrderRepositoryImpl;
    type LocationRepo = LocationRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn identity_service(&self) -> &IdentityService<Self::UserRepo> {
        &self.identity_service
    }

    fn address_service(&self) -> &AddressService<Self::UserRepo> {
        &self.address_service
    }

    fn cart_service(&self) -> &CartService<Self::UserRepo, Self::ProductRepo> {
        &self.cart_service
    }

    fn wishlist_service(&self) -> &WishlistService<Self::UserRepo, Self::ProductRepo> {
        &self.wishlist_service
    }

    fn catalog_service(&self) -> &CatalogService<Self::ProductRepo> {
        &self.catalog_service
    }

    fn order_service(&self) -> &OrderService<Self::OrderRepo, Self::UserRepo> {
        &self.order_service
    }

    fn location_service(&self) -> &LocationService<Self::LocationRepo> {
        &self.location_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool);
    let app = build_router(state, prometheus_handle);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the HTTP router with generic state type
///
/// Generic over the state so the production `AppState` and the in-memory
/// test state share one routing table and middleware stack.
pub fn build_router<S: HasServices>(state: S, prometheus_handle: Option<PrometheusHandle>) -> Router {
    let config = state.config();
    let cors = cors_layer(&config.cors);
    let security_headers = config.security_headers.clone();
    let request_timeout = Duration::from_secs(config.request_timeout_secs);

    let api_routes = Router::new()
        // Auth
        .route("/auth/register", post(api::auth::register::<S>))
        .route("/auth/login", post(api::auth::login::<S>))
        // Own profile
        .route(
            "/users/profile",
            get(api::user::get_profile::<S>).put(api::user::update_profile::<S>),
        )
        .route(
            "/users/change-password",
            put(api::user::change_password::<S>),
        )
        .route(
            "/users/addresses",
            get(api::address::list::<S>).post(api::address::add::<S>),
        )
        .route(
            "/users/addresses/{id}",
            put(api::address::update::<S>).delete(api::address::remove::<S>),
        )
        // Cart & wishlist
        .route(
            "/cart",
            get(api::cart::get::<S>).post(api::cart::add::<S>),
        )
        .route(
            "/cart/{product_id}",
            delete(api::cart::remove::<S>),
        )
        .route(
            "/wishlist",
            get(api::wishlist::get::<S>).post(api::wishlist::add::<S>),
        )
        .route(
            "/wishlist/{product_id}",
            delete(api::wishlist::remove::<S>),
        )
        // Catalog
        .route(
            "/products",
            get(api::product::list::<S>).post(api::product::create::<S>),
        )
        .route(
            "/products/slug/{slug}",
            get(api::product::get_by_slug::<S>),
        )
        .route(
            "/products/{id}",
            get(api::product::get::<S>)
                .put(api::product::update::<S>)
                .delete(api::product::delete::<S>),
        )
        .route(
            "/products/{id}/reviews",
            post(api::product::create_review::<S>),
        )
        // Orders
        .route(
            "/orders",
            get(api::order::list_all::<S>).post(api::order::create::<S>),
        )
        .route("/orders/myorders", get(api::order::list_mine::<S>))
        .route("/orders/{id}", get(api::order::get::<S>))
        .route(
            "/orders/{id}/status",
            put(api::order::update_status::<S>),
        )
        // Admin identity management
        .route("/admin/users", get(api::admin::list_users::<S>))
        .route(
            "/admin/users/{id}",
            get(api::admin::get_user::<S>)
                .put(api::admin::update_user::<S>)
                .delete(api::admin::delete_user::<S>),
        )
        // Delivery locations
        .route(
            "/locations",
            get(api::location::list::<S>).put(api::location::upsert::<S>),
        )
        .route(
            "/locations/{province}",
            get(api::location::get::<S>).delete(api::location::delete::<S>),
        );

    let metrics_routes = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(prometheus_handle));

    Router::new()
        .route("/", get(api::welcome))
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(metrics_routes)
        // Add middleware (last added runs first)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(normalize_error_response))
        .layer(middleware::from_fn_with_state(
            security_headers,
            security_headers_middleware,
        ))
        .layer(cors)
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(CompressionLayer::new())
}
