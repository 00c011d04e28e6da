//! Public catalog reads.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::api::AppState;
use crate::catalog::{ProductFilter, SiteConfig};
use crate::domain::aggregates::{Category, Customization, Product};
use crate::error::{AppError, Result};

/// A product page: the product plus the customizations it can be configured with.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub customizations: Vec<Customization>,
}

pub async fn list_products(State(s): State<AppState>, Query(filter): Query<ProductFilter>) -> Json<Vec<Product>> {
    Json(s.catalog.products(&filter).await)
}

pub async fn get_product(State(s): State<AppState>, Path(slug): Path<String>) -> Result<Json<ProductDetail>> {
    let product = s.catalog.product_by_slug(&slug).await.ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;
    let all = s.catalog.customizations().await;
    let customizations = product.customizations(&all).into_iter().cloned().collect();
    Ok(Json(ProductDetail { product, customizations }))
}

pub async fn list_categories(State(s): State<AppState>) -> Json<Vec<Category>> {
    Json(s.catalog.categories().await)
}

pub async fn list_customizations(State(s): State<AppState>) -> Json<Vec<Customization>> {
    Json(s.catalog.customizations().await)
}

pub async fn site_config(State(s): State<AppState>) -> Json<SiteConfig> {
    Json(s.catalog.site_config().await)
}
