//! Session-scoped shopping cart.
//!
//! The cart is owned by a single customer session; there is no cross-session
//! sharing and therefore no locking. It serializes into the session store and
//! is cleared only on successful payment confirmation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cart manipulation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("no cart line with id {0:?}")]
    LineNotFound(String),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// A single product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product/variant identifier; unique within the cart.
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    /// Storage reference for the product image.
    pub image_ref: String,
}

impl CartLine {
    /// Extended price for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Ordered collection of cart lines, keyed by line id.
///
/// Insertion order is preserved for display; totals are order-independent.
/// Invariant: no two lines share an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a line, merging quantity into an existing line with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if the line's quantity is 0.
    pub fn add_line(&mut self, line: CartLine) -> Result<(), CartError> {
        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
        Ok(())
    }

    /// Set a line's quantity; 0 removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has the given id.
    pub fn set_quantity(&mut self, line_id: &str, quantity: u32) -> Result<(), CartError> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| CartError::LineNotFound(line_id.to_string()))?;
        if quantity == 0 {
            self.lines.remove(idx);
        } else if let Some(line) = self.lines.get_mut(idx) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has the given id.
    pub fn remove_line(&mut self, line_id: &str) -> Result<(), CartError> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| CartError::LineNotFound(line_id.to_string()))?;
        self.lines.remove(idx);
        Ok(())
    }

    /// Clear the cart. Called only after payment confirmation.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ(unit price × quantity) over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, price: i64, qty: u32) -> CartLine {
        CartLine {
            id: id.to_string(),
            name: format!("Product {id}"),
            unit_price: Decimal::new(price, 2),
            quantity: qty,
            image_ref: format!("products/{id}.jpg"),
        }
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let mut cart = Cart::new();
        cart.add_line(line("a", 1999, 2)).expect("add");
        cart.add_line(line("b", 550, 1)).expect("add");
        assert_eq!(cart.subtotal(), Decimal::new(4548, 2));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_duplicate_id_merges_quantity() {
        let mut cart = Cart::new();
        cart.add_line(line("a", 1000, 1)).expect("add");
        cart.add_line(line("a", 1000, 2)).expect("add");
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_line(line("a", 1000, 1)).expect("add");
        cart.set_quantity("a", 0).expect("set");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_missing_line_is_an_error() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.remove_line("nope"),
            Err(CartError::LineNotFound("nope".into()))
        );
        assert_eq!(
            cart.set_quantity("nope", 2),
            Err(CartError::LineNotFound("nope".into()))
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_line(line("b", 100, 1)).expect("add");
        cart.add_line(line("a", 100, 1)).expect("add");
        let ids: Vec<_> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_session_round_trip() {
        let mut cart = Cart::new();
        cart.add_line(line("a", 1999, 2)).expect("add");
        let json = serde_json::to_string(&cart).expect("serialize");
        let restored: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, cart);
    }
}
