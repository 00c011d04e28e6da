//! HTTP surface: storefront reads, the cart, and the admin API.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::CatalogStore;
use crate::domain::checkout::CheckoutOptions;
use crate::engine::CartEngine;
use crate::storage::KeyValueStore;

pub mod admin;
pub mod cart;
pub mod storefront;

pub type SharedCart = Arc<Mutex<CartEngine<Box<dyn KeyValueStore>>>>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogStore,
    pub cart: SharedCart,
    pub checkout: Arc<CheckoutOptions>,
    pub admin_password: Arc<str>,
}

impl AppState {
    pub fn new(catalog: CatalogStore, store: Box<dyn KeyValueStore>, checkout: CheckoutOptions, admin_password: impl Into<Arc<str>>) -> Self {
        Self {
            catalog,
            cart: Arc::new(Mutex::new(CartEngine::open(store))),
            checkout: Arc::new(checkout),
            admin_password: admin_password.into(),
        }
    }

    /// The cart is single-user; concurrent requests are serialized here.
    pub fn cart(&self) -> MutexGuard<'_, CartEngine<Box<dyn KeyValueStore>>> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "decofire-storefront"})) }))
        .route("/api/v1/products", get(storefront::list_products))
        .route("/api/v1/products/:slug", get(storefront::get_product))
        .route("/api/v1/categories", get(storefront::list_categories))
        .route("/api/v1/customizations", get(storefront::list_customizations))
        .route("/api/v1/site", get(storefront::site_config))
        .route("/api/v1/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/api/v1/cart/items", post(cart::add_item))
        .route("/api/v1/cart/items/:id", put(cart::update_item).delete(cart::remove_item))
        .route("/api/v1/cart/checkout", get(cart::checkout))
        .route("/api/v1/admin/login", post(admin::login))
        .route("/api/v1/admin/logout", post(admin::logout))
        .route("/api/v1/admin/products", post(admin::create_product))
        .route("/api/v1/admin/products/:id", put(admin::update_product).delete(admin::delete_product))
        .route("/api/v1/admin/products/:id/images", delete(admin::delete_product_image))
        .route("/api/v1/admin/categories", post(admin::create_category))
        .route("/api/v1/admin/categories/:id", put(admin::update_category).delete(admin::delete_category))
        .route("/api/v1/admin/customizations/:id", put(admin::upsert_customization).delete(admin::delete_customization))
        .route("/api/v1/admin/site", put(admin::update_site))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
