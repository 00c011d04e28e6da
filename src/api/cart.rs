//! Cart route handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::aggregates::{CartLineItem, CartState};
use crate::domain::pricing::configure;
use crate::engine::CartEngine;
use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub total: Decimal,
    pub item_count: usize,
    pub unit_count: u64,
    pub state: CartState,
}

impl<S: KeyValueStore> From<&CartEngine<S>> for CartView {
    fn from(engine: &CartEngine<S>) -> Self {
        Self {
            items: engine.items().to_vec(),
            total: engine.total(),
            item_count: engine.item_count(),
            unit_count: engine.unit_count(),
            state: engine.state(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Customization id to chosen option value.
    #[serde(default)]
    pub options: HashMap<String, String>,
}

fn default_quantity() -> i64 { 1 }

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub message: String,
    pub total: Decimal,
}

pub async fn get_cart(State(s): State<AppState>) -> Json<CartView> {
    Json(CartView::from(&*s.cart()))
}

pub async fn add_item(State(s): State<AppState>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, Json<CartView>)> {
    let quantity = u32::try_from(r.quantity)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or_else(|| AppError::BadRequest("quantity must be at least 1".into()))?;
    let product = s.catalog.product(&r.product_id).await.ok_or_else(|| AppError::NotFound(format!("product {}", r.product_id)))?;
    let customizations = s.catalog.customizations().await;
    let configuration = configure(&product, &customizations, &r.options);

    let mut cart = s.cart();
    let item_id = cart.add_to_cart(product, quantity, configuration.unit_price, configuration.selections);
    tracing::info!(product_id = %r.product_id, %item_id, quantity, "added to cart");
    Ok((StatusCode::CREATED, Json(CartView::from(&*cart))))
}

pub async fn update_item(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<UpdateQuantityRequest>) -> Json<CartView> {
    let mut cart = s.cart();
    cart.update_quantity(&id, r.quantity);
    Json(CartView::from(&*cart))
}

pub async fn remove_item(State(s): State<AppState>, Path(id): Path<String>) -> Json<CartView> {
    let mut cart = s.cart();
    cart.remove_from_cart(&id);
    Json(CartView::from(&*cart))
}

pub async fn clear_cart(State(s): State<AppState>) -> Json<CartView> {
    let mut cart = s.cart();
    cart.clear_cart();
    Json(CartView::from(&*cart))
}

pub async fn checkout(State(s): State<AppState>) -> Json<CheckoutView> {
    let cart = s.cart();
    Json(CheckoutView { message: cart.checkout_message(&s.checkout), total: cart.total() })
}
