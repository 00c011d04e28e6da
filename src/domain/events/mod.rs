//! Domain events
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Catalog(CatalogEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    ItemAdded { item_id: String, quantity: u32, price: Decimal },
    ItemMerged { item_id: String, added: u32, quantity: u32 },
    ItemRemoved { item_id: String },
    QuantityUpdated { item_id: String, quantity: u32 },
    Cleared { removed: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatalogEvent {
    ProductSaved { product_id: String },
    ProductDeleted { product_id: String },
    CategorySaved { category_id: String },
    CategoryDeleted { category_id: String },
    CustomizationSaved { customization_id: String },
    CustomizationDeleted { customization_id: String, detached_from: usize },
    SiteConfigSaved,
}
