//! Cart

use std::num::NonZeroU32;

use rusty_money::{
    Money,
    iso::{Currency, USD},
};
use thiserror::Error;

use crate::{
    items::LineItem,
    pricing::{TotalPriceError, total_price},
    products::Product,
};

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A price's currency differs from the cart currency (id, price currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A unit price was below zero.
    #[error("Item {0} has a negative price")]
    NegativePrice(String),

    /// A quantity change would not fit in a `u32`.
    #[error("Quantity overflow for item {0}")]
    QuantityOverflow(String),
}

/// Outcome of a cart operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartChange {
    /// The cart was (re)hydrated from storage.
    Loaded,

    /// A new line item was appended with quantity 1.
    Added {
        /// Product id
        id: String,
    },

    /// An existing line item's quantity was set.
    QuantityChanged {
        /// Product id
        id: String,
        /// Quantity after the change
        quantity: NonZeroU32,
    },

    /// A line item was removed.
    Removed {
        /// Product id
        id: String,
    },

    /// Every line item was removed.
    Cleared {
        /// Number of line items that were in the cart
        removed: usize,
    },

    /// The operation targeted an id not in the cart.
    Unchanged,
}

/// An ordered, id-unique list of line items.
///
/// Totals are never stored; they are recomputed from the list on every call.
#[derive(Clone, Debug, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    currency: &'static Currency,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Create an empty cart priced in USD.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            currency: USD,
        }
    }

    /// Build a cart from line items already known to be id-unique.
    pub(crate) fn from_items(items: Vec<LineItem>) -> Self {
        Self {
            items,
            currency: USD,
        }
    }

    /// Add one unit of a product.
    ///
    /// If a line with this id already exists its quantity is incremented and the stored name
    /// and price are left as they were; otherwise a new line is appended with quantity 1.
    ///
    /// # Errors
    ///
    /// - [`CartError::CurrencyMismatch`]: the price is not in the cart currency.
    /// - [`CartError::NegativePrice`]: the price is below zero.
    /// - [`CartError::QuantityOverflow`]: the existing quantity is already `u32::MAX`.
    pub fn add_item(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money<'_, Currency>,
    ) -> Result<CartChange, CartError> {
        let id = id.into();

        if price.currency() != self.currency {
            return Err(CartError::CurrencyMismatch(
                id,
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let price_minor = price.to_minor_units();

        if price_minor < 0 {
            return Err(CartError::NegativePrice(id));
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            let quantity = item
                .quantity()
                .checked_add(1)
                .ok_or_else(|| CartError::QuantityOverflow(id.clone()))?;

            item.set_quantity(quantity);

            return Ok(CartChange::QuantityChanged { id, quantity });
        }

        self.items.push(LineItem::new(
            id.clone(),
            name,
            price_minor,
            NonZeroU32::MIN,
        ));

        Ok(CartChange::Added { id })
    }

    /// Add one unit of a catalog product.
    ///
    /// # Errors
    ///
    /// See [`Cart::add_item`].
    pub fn add_product(&mut self, product: &Product) -> Result<CartChange, CartError> {
        self.add_item(product.id.as_str(), product.name.as_str(), product.price)
    }

    /// Change a line's quantity by `delta`.
    ///
    /// A missing id is a no-op. A resulting quantity of zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the new quantity exceeds `u32::MAX`. The cart
    /// is left unchanged.
    pub fn update_quantity(&mut self, id: &str, delta: i64) -> Result<CartChange, CartError> {
        let Some(position) = self.items.iter().position(|item| item.id() == id) else {
            return Ok(CartChange::Unchanged);
        };

        let Some(item) = self.items.get_mut(position) else {
            return Ok(CartChange::Unchanged);
        };

        let new_quantity = i64::from(item.quantity().get())
            .checked_add(delta)
            .ok_or_else(|| CartError::QuantityOverflow(id.to_string()))?;

        if new_quantity <= 0 {
            self.items.remove(position);

            return Ok(CartChange::Removed { id: id.to_string() });
        }

        let quantity = u32::try_from(new_quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| CartError::QuantityOverflow(id.to_string()))?;

        item.set_quantity(quantity);

        Ok(CartChange::QuantityChanged {
            id: id.to_string(),
            quantity,
        })
    }

    /// Remove the line with this id, if present.
    pub fn remove_item(&mut self, id: &str) -> CartChange {
        let before = self.items.len();

        self.items.retain(|item| item.id() != id);

        if self.items.len() == before {
            CartChange::Unchanged
        } else {
            CartChange::Removed { id: id.to_string() }
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) -> CartChange {
        let removed = self.items.len();

        self.items.clear();

        CartChange::Cleared { removed }
    }

    /// Get the line with this id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Number of distinct lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate `Σ price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the total overflows.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        total_price(&self.items, self.currency)
    }

    /// Calculate `Σ quantity`, the number shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn usd(major: i64) -> Money<'static, Currency> {
        Money::from_minor(major * 100, USD)
    }

    #[test]
    fn add_new_item_appends_with_quantity_one() -> TestResult {
        let mut cart = Cart::new();

        let change = cart.add_item("watch", "Avance APEX", usd(1199))?;

        assert_eq!(change, CartChange::Added { id: "watch".into() });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("watch").map(|item| item.quantity().get()), Some(1));

        Ok(())
    }

    #[test]
    fn add_existing_item_increments_quantity() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("watch", "Avance APEX", usd(1199))?;
        let change = cart.add_item("watch", "Avance APEX", usd(1199))?;

        assert!(matches!(
            change,
            CartChange::QuantityChanged { quantity, .. } if quantity.get() == 2
        ));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal()?, usd(2398));

        Ok(())
    }

    #[test]
    fn add_existing_item_keeps_original_snapshot() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("band", "Avance Band", usd(79))?;
        cart.add_item("band", "Renamed Band", usd(99))?;

        let item = cart.get("band").ok_or("missing band")?;

        assert_eq!(item.name(), "Avance Band");
        assert_eq!(item.price_minor(), 7_900);
        assert_eq!(item.quantity().get(), 2);

        Ok(())
    }

    #[test]
    fn add_item_currency_mismatch_errors() {
        let mut cart = Cart::new();

        let result = cart.add_item("watch", "Avance Watch", Money::from_minor(100, GBP));

        assert_eq!(
            result,
            Err(CartError::CurrencyMismatch(
                "watch".into(),
                GBP.iso_alpha_code,
                USD.iso_alpha_code
            ))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn add_item_negative_price_errors() {
        let mut cart = Cart::new();

        let result = cart.add_item("watch", "Avance Watch", Money::from_minor(-1, USD));

        assert_eq!(result, Err(CartError::NegativePrice("watch".into())));
    }

    #[test]
    fn decrement_to_zero_removes_item() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("band", "Avance Band", usd(449))?;
        let change = cart.update_quantity("band", -1)?;

        assert_eq!(change, CartChange::Removed { id: "band".into() });
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn large_negative_delta_removes_item() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("ring", "Avance Rings", usd(150))?;
        cart.add_item("ring", "Avance Rings", usd(150))?;
        cart.update_quantity("ring", -10)?;

        assert!(cart.get("ring").is_none());

        Ok(())
    }

    #[test]
    fn update_quantity_sets_new_quantity() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("ring", "Avance Rings", usd(150))?;
        cart.update_quantity("ring", 4)?;
        cart.update_quantity("ring", -2)?;

        assert_eq!(cart.get("ring").map(|item| item.quantity().get()), Some(3));

        Ok(())
    }

    #[test]
    fn update_quantity_missing_id_is_noop() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("ring", "Avance Rings", usd(150))?;
        let change = cart.update_quantity("watch", 1)?;

        assert_eq!(change, CartChange::Unchanged);
        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn update_quantity_overflow_leaves_cart_unchanged() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("ring", "Avance Rings", usd(150))?;
        let result = cart.update_quantity("ring", i64::from(u32::MAX));

        assert_eq!(result, Err(CartError::QuantityOverflow("ring".into())));
        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn remove_item_deletes_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("ring", "Avance Rings", usd(150))?;
        cart.add_item("watch", "Avance Watch", usd(299))?;

        assert_eq!(cart.remove_item("ring"), CartChange::Removed { id: "ring".into() });
        assert_eq!(cart.remove_item("ring"), CartChange::Unchanged);
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn clear_twice_is_empty_both_times() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("ring", "Avance Rings", usd(150))?;

        assert_eq!(cart.clear(), CartChange::Cleared { removed: 1 });
        assert!(cart.is_empty());
        assert_eq!(cart.clear(), CartChange::Cleared { removed: 0 });
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn totals_for_two_lines() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("watch", "Avance APEX", usd(1199))?;
        cart.add_item("band", "Avance Band", usd(449))?;
        cart.add_item("band", "Avance Band", usd(449))?;

        assert_eq!(cart.subtotal()?, usd(2097));
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn empty_cart_totals_are_zero() -> TestResult {
        let cart = Cart::default();

        assert_eq!(cart.subtotal()?, usd(0));
        assert_eq!(cart.item_count(), 0);

        Ok(())
    }

    #[test]
    fn iter_returns_lines_in_insertion_order() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("wat", "Avance Wat", usd(199))?;
        cart.add_item("band", "Avance Band", usd(79))?;
        cart.add_item("wat", "Avance Wat", usd(199))?;

        let ids: Vec<&str> = cart.iter().map(LineItem::id).collect();

        assert_eq!(ids, ["wat", "band"]);

        Ok(())
    }
}
