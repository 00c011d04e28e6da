//! Unit pricing for a configured product.
//!
//! The cart never prices anything itself; callers resolve the customer's
//! choices here and pass the resulting unit price to the cart.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::aggregates::cart::SelectedCustomization;
use crate::domain::aggregates::product::{Customization, Product};

#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    pub unit_price: Decimal,
    pub selections: Vec<SelectedCustomization>,
}

/// Resolves `chosen` (customization id to option value) against the product's
/// customizations. A missing or unknown choice falls back to the first option.
pub fn configure(product: &Product, customizations: &[Customization], chosen: &HashMap<String, String>) -> Configuration {
    let mut unit_price = product.price;
    let mut selections = Vec::new();
    for customization in product.customizations(customizations) {
        let option = chosen
            .get(&customization.id)
            .and_then(|value| customization.option(value))
            .or_else(|| customization.default_option());
        let Some(option) = option else { continue };
        unit_price = unit_price.checked_add(option.price_modifier).unwrap_or(Decimal::MAX);
        selections.push(SelectedCustomization::new(&customization.id, &customization.name, &option.value));
    }
    Configuration { unit_price, selections }
}
