//! DecoFire Storefront
//!
//! Self-hosted storefront for handmade decor with a local cart.
//!
//! ## Features
//! - Product catalog with categories and subcategories
//! - Product customizations with per-option price modifiers
//! - Cart with order-independent line identity and best-effort local persistence
//! - Order message for checkout through an external messaging app
//! - Password-gated catalog administration

pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod storage;

pub use api::{router, AppState};
pub use catalog::{CatalogError, CatalogStore, ProductFilter};
pub use config::{AppConfig, ConfigError};
pub use domain::aggregates::{derive_id, Cart, CartLineItem, CartState, Category, Customization, Product, SelectedCustomization};
pub use domain::checkout::CheckoutOptions;
pub use engine::CartEngine;
pub use error::{AppError, Result};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
