//! The client-owned cart ledger.
//!
//! A [`Cart`] keeps one line per product, in first-add order, and every line
//! always has a quantity of at least one. The only way to reach zero is to
//! remove the line. These invariants also hold for carts rebuilt from a
//! persisted snapshot: deserialization goes through the same merge logic as
//! [`Cart::add`], so a tampered or duplicated snapshot is normalised instead of
//! trusted.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::money::Money;

/// The product fields a cart line needs when it is first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Money,
}

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Stable product identifier (at most one line per ID).
    pub id: ProductId,
    /// Product name captured at first add.
    pub name: String,
    /// Price per unit captured at first add.
    pub unit_price: Money,
    /// Quantity, always >= 1.
    pub qty: u32,
}

impl CartItem {
    /// `unit_price × qty`.
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.unit_price.times(self.qty)
    }
}

/// An ordered list of cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Add `qty` units of a product.
    ///
    /// An existing line keeps its position, name and price and only has its
    /// quantity increased. A new product is appended. Adding zero units is a
    /// no-op. Returns whether the cart changed.
    pub fn add(&mut self, product: CartProduct, qty: u32) -> bool {
        if qty == 0 {
            return false;
        }

        if let Some(existing) = self.items.iter_mut().find(|item| item.id == product.id) {
            existing.qty = existing.qty.saturating_add(qty);
        } else {
            self.items.push(CartItem {
                id: product.id,
                name: product.name,
                unit_price: product.unit_price,
                qty,
            });
        }
        true
    }

    /// Set the quantity of a line, clamped to at least one.
    ///
    /// Accepts a signed value because it usually comes straight from a form
    /// field. Returns `false` when the product is not in the cart.
    pub fn update_qty(&mut self, id: &ProductId, qty: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        item.qty = u32::try_from(qty.max(1)).unwrap_or(u32::MAX);
        true
    }

    /// Remove a line. Returns `false` when the product is not in the cart.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// `Σ unit_price × qty`, recomputed on every call.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.qty))
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            let qty = item.qty;
            cart.add(
                CartProduct {
                    id: item.id,
                    name: item.name,
                    unit_price: item.unit_price,
                },
                qty,
            );
        }
        cart
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: &str, price: u64) -> CartProduct {
        CartProduct {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Money::new(price),
        }
    }

    #[test]
    fn test_add_aggregates_same_product() {
        let mut cart = Cart::new();
        cart.add(product("a", 500), 2);
        cart.add(product("a", 500), 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty, 5);
        assert_eq!(cart.subtotal(), Money::new(2500));
    }

    #[test]
    fn test_add_preserves_first_insertion_position() {
        let mut cart = Cart::new();
        cart.add(product("b", 100), 1);
        cart.add(product("a", 200), 1);
        cart.add(product("b", 100), 4);

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(cart.get(&ProductId::new("b")).unwrap().qty, 5);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add(product("a", 100), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_qty_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), 3);

        assert!(cart.update_qty(&ProductId::new("a"), 0));
        assert_eq!(cart.items()[0].qty, 1);

        assert!(cart.update_qty(&ProductId::new("a"), -7));
        assert_eq!(cart.items()[0].qty, 1);

        assert!(cart.update_qty(&ProductId::new("a"), 9));
        assert_eq!(cart.items()[0].qty, 9);
    }

    #[test]
    fn test_update_qty_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), 1);
        assert!(!cart.update_qty(&ProductId::new("zzz"), 4));
        assert_eq!(cart.items()[0].qty, 1);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), 1);
        cart.add(product("b", 100), 1);

        assert!(cart.remove(&ProductId::new("a")));
        assert!(!cart.remove(&ProductId::new("a")));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), 2);
        cart.clear();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::ZERO);
    }

    #[test]
    fn test_invariants_hold_for_mixed_sequence() {
        let mut cart = Cart::new();
        let ids = ["a", "b", "c", "d"];
        for step in 0..200_i64 {
            let id = ids[usize::try_from(step).unwrap() % ids.len()];
            match step % 5 {
                0 | 1 => {
                    cart.add(product(id, 10 + u64::try_from(step).unwrap()), 1 + (step as u32 % 3));
                }
                2 => {
                    cart.update_qty(&ProductId::new(id), step % 7 - 3);
                }
                3 => {
                    cart.remove(&ProductId::new(id));
                }
                _ => {
                    cart.add(product(id, 10), 0);
                }
            }

            assert!(cart.items().iter().all(|item| item.qty >= 1));
            let expected: u64 = cart
                .items()
                .iter()
                .map(|item| item.unit_price.amount() * u64::from(item.qty))
                .sum();
            assert_eq!(cart.subtotal().amount(), expected);

            let mut seen: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), cart.items().len());
        }
    }

    #[test]
    fn test_snapshot_roundtrip_and_normalisation() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), 2);
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(serde_json::from_str::<Cart>(&json).unwrap(), cart);

        // A snapshot with duplicate IDs and a zero quantity is repaired.
        let tampered = r#"[
            {"id":"a","name":"A","unit_price":100,"qty":2},
            {"id":"b","name":"B","unit_price":50,"qty":0},
            {"id":"a","name":"A again","unit_price":999,"qty":1}
        ]"#;
        let repaired: Cart = serde_json::from_str(tampered).unwrap();
        assert_eq!(repaired.items().len(), 1);
        assert_eq!(repaired.items()[0].qty, 3);
        assert_eq!(repaired.items()[0].name, "A");
        assert_eq!(repaired.subtotal(), Money::new(300));
    }

    #[test]
    fn test_item_count() {
        let mut cart = Cart::new();
        cart.add(product("a", 1), 2);
        cart.add(product("b", 1), 3);
        assert_eq!(cart.item_count(), 5);
    }
}
