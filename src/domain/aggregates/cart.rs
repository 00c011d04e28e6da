//! Cart Aggregate
//!
//! A thin reducer over an ordered list of line items. Line identity is derived
//! from the product id and the *set* of selected customization values, so two
//! additions of the same configuration always land on the same line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::product::Product;
use crate::domain::events::{CartEvent, DomainEvent};

const PAIR_SEPARATOR: &str = "|";

/// One customization dimension applied to a line item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCustomization {
    pub customization_id: String,
    pub customization_name: String,
    pub option_value: String,
}

impl SelectedCustomization {
    pub fn new(customization_id: impl Into<String>, customization_name: impl Into<String>, option_value: impl Into<String>) -> Self {
        Self { customization_id: customization_id.into(), customization_name: customization_name.into(), option_value: option_value.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: String,
    /// Snapshot taken when the line was created; later catalog edits do not reach it.
    pub product: Product,
    pub quantity: u32,
    /// Unit price, customization modifiers included.
    pub price: Decimal,
    #[serde(default)]
    pub customizations: Vec<SelectedCustomization>,
}

impl CartLineItem {
    /// `price * quantity`, saturating at `Decimal::MAX` instead of overflowing.
    pub fn subtotal(&self) -> Decimal { self.price.checked_mul(Decimal::from(self.quantity)).unwrap_or(Decimal::MAX) }
}

/// Derives a line item's identity.
///
/// A bare product is keyed by its id. Otherwise the `customizationId:optionValue`
/// pairs are sorted before joining, which makes the id independent of the order
/// the customizations were configured in.
pub fn derive_id(product_id: &str, customizations: &[SelectedCustomization]) -> String {
    if customizations.is_empty() {
        return product_id.to_string();
    }
    let mut pairs: Vec<String> = customizations
        .iter()
        .map(|c| format!("{}:{}", c.customization_id, c.option_value))
        .collect();
    pairs.sort();
    format!("{product_id}-{}", pairs.join(PAIR_SEPARATOR))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CartState { Empty, Populated }

#[derive(Clone, Debug, Default)]
pub struct Cart {
    items: Vec<CartLineItem>,
    events: Vec<DomainEvent>,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    /// Rehydrates a cart from stored lines. Lines with a zero quantity are
    /// dropped and repeated ids are folded into their first occurrence.
    pub fn from_items(stored: Vec<CartLineItem>) -> Self {
        let mut items: Vec<CartLineItem> = Vec::with_capacity(stored.len());
        for item in stored.into_iter().filter(|i| i.quantity > 0) {
            match items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
                None => items.push(item),
            }
        }
        Self { items, events: vec![] }
    }

    pub fn items(&self) -> &[CartLineItem] { &self.items }
    pub fn item(&self, item_id: &str) -> Option<&CartLineItem> { self.items.iter().find(|i| i.id == item_id) }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn unit_count(&self) -> u64 { self.items.iter().map(|i| u64::from(i.quantity)).sum() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn state(&self) -> CartState {
        if self.items.is_empty() { CartState::Empty } else { CartState::Populated }
    }

    /// Sum of `price * quantity`, recomputed on every call. Saturates at `Decimal::MAX`.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::subtotal)
            .fold(Decimal::ZERO, |acc, subtotal| acc.checked_add(subtotal).unwrap_or(Decimal::MAX))
    }

    /// Adds `quantity` units of a configured product and returns the line id.
    ///
    /// When the derived id already exists only the quantity grows; the existing
    /// line keeps its original price and customization snapshot.
    pub fn add(&mut self, product: Product, quantity: u32, price: Decimal, customizations: Vec<SelectedCustomization>) -> String {
        let id = derive_id(&product.id, &customizations);
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            let total_quantity = existing.quantity;
            self.raise_event(CartEvent::ItemMerged { item_id: id.clone(), added: quantity, quantity: total_quantity });
        } else {
            self.items.push(CartLineItem { id: id.clone(), product, quantity, price, customizations });
            self.raise_event(CartEvent::ItemAdded { item_id: id.clone(), quantity, price });
        }
        id
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        let removed = self.items.len() != before;
        if removed {
            self.raise_event(CartEvent::ItemRemoved { item_id: item_id.to_string() });
        }
        removed
    }

    /// Sets a line's quantity. Anything below 1 removes the line.
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> bool {
        if quantity < 1 {
            return self.remove(item_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else { return false };
        item.quantity = quantity;
        self.raise_event(CartEvent::QuantityUpdated { item_id: item_id.to_string(), quantity });
        true
    }

    pub fn clear(&mut self) {
        let removed = self.items.len();
        self.items.clear();
        self.raise_event(CartEvent::Cleared { removed });
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: CartEvent) { self.events.push(DomainEvent::Cart(e)); }
}
