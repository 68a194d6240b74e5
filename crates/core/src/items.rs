//! Items

use std::num::NonZeroU32;

use rusty_money::iso::Currency;

use crate::pricing::{TotalPriceError, format_minor, line_total};

/// One product-quantity pairing within a cart.
///
/// `name` and `price` are a snapshot taken when the product was first added and are never
/// re-synced with the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineItem {
    id: String,
    name: String,
    price: i64,
    quantity: NonZeroU32,
}

impl LineItem {
    /// Creates a new line item with a unit price in minor units.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price_minor: i64,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price_minor,
            quantity,
        }
    }

    /// Returns the product id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name captured at add time
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price in minor units
    pub fn price_minor(&self) -> i64 {
        self.price
    }

    /// Returns the quantity
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    /// Returns `price × quantity` in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the total does not fit in an `i64`.
    pub fn line_total(&self) -> Result<i64, TotalPriceError> {
        line_total(self.price, self.quantity.get())
    }
}

/// A line item enriched with catalog-derived display fields.
///
/// Built at render time only; nothing here is ever persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayLineItem<'a> {
    item: &'a LineItem,
    thumbnail: &'a str,
    currency: &'static Currency,
}

impl<'a> DisplayLineItem<'a> {
    /// Wraps a line item with its thumbnail.
    pub fn new(item: &'a LineItem, thumbnail: &'a str, currency: &'static Currency) -> Self {
        Self {
            item,
            thumbnail,
            currency,
        }
    }

    /// Returns the underlying line item
    pub fn item(&self) -> &'a LineItem {
        self.item
    }

    /// Returns the thumbnail image path
    pub fn thumbnail(&self) -> &'a str {
        self.thumbnail
    }

    /// Unit price formatted for display
    pub fn formatted_price(&self) -> String {
        format_minor(self.item.price_minor(), self.currency)
    }

    /// Line total formatted for display.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the line total overflows.
    pub fn formatted_line_total(&self) -> Result<String, TotalPriceError> {
        Ok(format_minor(self.item.line_total()?, self.currency))
    }
}
