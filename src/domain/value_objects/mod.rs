//! Value Objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// URL slug derived from a product name.
///
/// Lowercased, whitespace runs collapsed to `-`, everything else that is not
/// an ASCII word character or `-` dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(name.len());
        let mut in_whitespace = false;
        for c in name.to_lowercase().chars() {
            if c.is_whitespace() {
                if !in_whitespace { slug.push('-'); }
                in_whitespace = true;
                continue;
            }
            in_whitespace = false;
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' { slug.push(c); }
        }
        if slug.is_empty() { return Err(SlugError::Empty); }
        Ok(Self(slug))
    }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Error)]
pub enum SlugError {
    #[error("name produces an empty slug")]
    Empty,
}

/// Renders an amount the way the storefront shows prices, e.g. `200.00 MAD`.
pub fn format_price(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {}", amount.round_dp(2), currency)
}
