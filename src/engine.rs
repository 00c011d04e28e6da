//! Cart engine: the cart reducer plus best-effort persistence.
//!
//! The engine rehydrates from the store once at startup and writes the whole
//! cart back after every mutation. Storage problems never reach the caller:
//! unreadable data starts an empty cart, failed writes are logged and the
//! in-memory cart stays authoritative.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::aggregates::{Cart, CartLineItem, CartState, Product, SelectedCustomization};
use crate::domain::checkout::{order_message, CheckoutOptions};
use crate::storage::KeyValueStore;

/// Key the serialized line items live under.
pub const CART_KEY: &str = "cart";

pub struct CartEngine<S> {
    cart: Cart,
    store: S,
}

impl<S: KeyValueStore> CartEngine<S> {
    pub fn open(store: S) -> Self {
        let cart = Cart::from_items(load_items(&store));
        debug!(items = cart.item_count(), "cart rehydrated");
        Self { cart, store }
    }

    pub fn items(&self) -> &[CartLineItem] { self.cart.items() }
    pub fn item(&self, item_id: &str) -> Option<&CartLineItem> { self.cart.item(item_id) }
    pub fn item_count(&self) -> usize { self.cart.item_count() }
    pub fn unit_count(&self) -> u64 { self.cart.unit_count() }
    pub fn state(&self) -> CartState { self.cart.state() }
    pub fn total(&self) -> Decimal { self.cart.total() }

    /// `quantity` is expected to be at least 1; it is not clamped here.
    pub fn add_to_cart(&mut self, product: Product, quantity: u32, price: Decimal, customizations: Vec<SelectedCustomization>) -> String {
        let id = self.cart.add(product, quantity, price, customizations);
        self.commit();
        id
    }

    pub fn remove_from_cart(&mut self, item_id: &str) {
        self.cart.remove(item_id);
        self.commit();
    }

    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) {
        self.cart.update_quantity(item_id, quantity);
        self.commit();
    }

    /// Persists an empty list rather than deleting the key.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.commit();
    }

    pub fn checkout_message(&self, options: &CheckoutOptions) -> String {
        order_message(self.cart.items(), self.cart.total(), options)
    }

    fn commit(&mut self) {
        for event in self.cart.take_events() {
            debug!(?event, "cart event");
        }
        let payload = match serde_json::to_string(self.cart.items()) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "failed to encode cart; keeping it in memory only");
                return;
            }
        };
        if let Err(error) = self.store.set(CART_KEY, &payload) {
            warn!(%error, "failed to persist cart; keeping it in memory only");
        }
    }
}

fn load_items<S: KeyValueStore>(store: &S) -> Vec<CartLineItem> {
    let raw = match store.get(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            warn!(%error, "failed to read stored cart; starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(error) => {
            warn!(%error, "stored cart is malformed; starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore, StorageError};

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io { action: "read", path: "cart.json".into(), source: std::io::Error::other("disk gone") })
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io { action: "write", path: "cart.json".into(), source: std::io::Error::other("disk gone") })
        }
    }

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.into(), slug: id.into(), name: format!("Produit {id}"), description: String::new(),
            price: Decimal::new(price, 0), image_urls: vec![], category_id: "deco".into(),
            sub_category_id: None, stock_level: 5, is_featured: false, customization_ids: None,
        }
    }

    #[test]
    fn test_mutations_survive_reload() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut engine = CartEngine::open(Arc::clone(&store));
        let id = engine.add_to_cart(product("A", 100), 2, Decimal::new(100, 0), vec![SelectedCustomization::new("finish", "Finition", "Noir")]);
        engine.add_to_cart(product("B", 50), 1, Decimal::new(50, 0), vec![]);
        engine.update_quantity(&id, 4);

        let reloaded = CartEngine::open(Arc::clone(&store));
        assert_eq!(reloaded.items(), engine.items());
        assert_eq!(reloaded.total(), Decimal::new(450, 0));
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut engine = CartEngine::open(Arc::clone(&store));
        engine.add_to_cart(product("A", 100), 1, Decimal::new(100, 0), vec![]);
        engine.clear_cart();
        assert_eq!(engine.total(), Decimal::ZERO);
        assert_eq!(store.get(CART_KEY).unwrap().as_deref(), Some("[]"));
        let reloaded = CartEngine::open(store);
        assert_eq!(reloaded.state(), CartState::Empty);
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let store = MemoryKeyValueStore::new();
        store.set(CART_KEY, "{not json").unwrap();
        let engine = CartEngine::open(store);
        assert_eq!(engine.item_count(), 0);
    }

    #[test]
    fn test_oversized_stored_cart_does_not_panic() {
        let store = MemoryKeyValueStore::new();
        let mut line = serde_json::to_value(CartLineItem {
            id: "A".into(), product: product("A", 1), quantity: 4_000_000_000, price: Decimal::ONE, customizations: vec![],
        })
        .unwrap();
        line["price"] = serde_json::json!(50000000000000000000.0);
        store.set(CART_KEY, &serde_json::Value::Array(vec![line]).to_string()).unwrap();

        let engine = CartEngine::open(store);
        assert_eq!(engine.item_count(), 1);
        assert_eq!(engine.total(), Decimal::MAX);
        assert!(engine.checkout_message(&CheckoutOptions::default()).contains("*Total: "));
    }

    #[test]
    fn test_failing_storage_keeps_memory_authoritative() {
        let mut engine = CartEngine::open(FailingStore);
        let id = engine.add_to_cart(product("A", 10), 1, Decimal::new(10, 0), vec![]);
        engine.update_quantity(&id, 3);
        assert_eq!(engine.total(), Decimal::new(30, 0));
        engine.remove_from_cart("unknown");
        assert_eq!(engine.item_count(), 1);
    }

    #[test]
    fn test_file_backed_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = CartEngine::open(FileKeyValueStore::new(dir.path()));
        engine.add_to_cart(product("A", 200), 1, Decimal::new(200, 0), vec![]);
        engine.add_to_cart(product("A", 200), 1, Decimal::new(200, 0), vec![]);

        let reloaded = CartEngine::open(FileKeyValueStore::new(dir.path()));
        assert_eq!(reloaded.item("A").map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_checkout_message_uses_current_lines() {
        let mut engine = CartEngine::open(MemoryKeyValueStore::new());
        engine.add_to_cart(product("A", 120), 2, Decimal::new(120, 0), vec![]);
        let message = engine.checkout_message(&CheckoutOptions::default());
        assert!(message.contains("*Produit A* (x2)"));
        assert!(message.ends_with("*Total: 240.00 MAD*"));
    }
}
