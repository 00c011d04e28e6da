//! Aggregates module
pub mod product;
pub mod cart;

pub use product::{Category, Customization, CustomizationOption, Product, SubCategory};
pub use cart::{derive_id, Cart, CartLineItem, CartState, SelectedCustomization};
