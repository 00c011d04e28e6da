//! Order message handed to the external messaging app at checkout.

use std::fmt::Write;

use rust_decimal::Decimal;

use crate::domain::aggregates::cart::CartLineItem;
use crate::domain::value_objects::format_price;

#[derive(Clone, Debug)]
pub struct CheckoutOptions {
    pub store_name: String,
    pub currency: String,
    /// Option values meaning "no customization"; they are left out of the message.
    pub sentinel_values: Vec<String>,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            store_name: "DecoFire".to_string(),
            currency: "MAD".to_string(),
            sentinel_values: vec!["None".to_string(), "Natural".to_string()],
        }
    }
}

impl CheckoutOptions {
    pub fn is_sentinel(&self, value: &str) -> bool { self.sentinel_values.iter().any(|s| s == value) }
}

pub fn order_message(items: &[CartLineItem], total: Decimal, options: &CheckoutOptions) -> String {
    let mut message = format!(
        "Bonjour {}, j'aimerais passer une commande pour les articles suivants :\n\n",
        options.store_name
    );
    for item in items {
        let _ = writeln!(message, "*{}* (x{})", item.product.name, item.quantity);
        for selection in item.customizations.iter().filter(|c| !options.is_sentinel(&c.option_value)) {
            let _ = writeln!(message, " - {}: {}", selection.customization_name, selection.option_value);
        }
        let _ = write!(message, "Sous-total: {}\n\n", format_price(item.subtotal(), &options.currency));
    }
    let _ = write!(message, "*Total: {}*", format_price(total, &options.currency));
    message
}
