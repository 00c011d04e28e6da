//! Storefront domain: catalog records, the cart reducer, pricing and checkout.
pub mod aggregates;
pub mod checkout;
pub mod events;
pub mod pricing;
pub mod value_objects;
