//! Persisted cart layout
//!
//! The cart is stored under [`CART_STORAGE_KEY`] as a JSON array of
//! `{ "id": string, "name": string, "price": number, "quantity": integer }`, with `price` in
//! major units. There is no schema version. Display-only fields are never written, and extra
//! fields found on read (older pages persisted an `image`) are ignored.

use std::num::NonZeroU32;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

use crate::{
    cart::Cart,
    items::LineItem,
    pricing::{to_decimal, to_minor_units},
};

/// Durable storage key shared by every page of the site.
pub const CART_STORAGE_KEY: &str = "avance-cart";

/// Errors raised while reading a persisted cart.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The stored value is not valid JSON.
    #[error("stored cart is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The stored value is valid JSON but not an array.
    #[error("stored cart is not an array")]
    NotAnArray,

    /// An entry does not have the `{id, name, price, quantity}` shape.
    #[error("stored cart entry {index} is malformed: {source}")]
    Entry {
        /// Position in the stored array
        index: usize,
        /// Underlying shape error
        #[source]
        source: serde_json::Error,
    },

    /// An entry's price is negative or not representable in cents.
    #[error("stored cart entry {index} has an invalid price: {price}")]
    InvalidPrice {
        /// Position in the stored array
        index: usize,
        /// Raw stored value
        price: String,
    },

    /// An entry's quantity is not an integer of at least 1.
    #[error("stored cart entry {index} has an invalid quantity: {quantity}")]
    InvalidQuantity {
        /// Position in the stored array
        index: usize,
        /// Raw stored value
        quantity: String,
    },

    /// Two entries share an id.
    #[error("stored cart entry {index} repeats id {id}")]
    DuplicateId {
        /// Position of the repeated entry
        index: usize,
        /// The repeated id
        id: String,
    },
}

/// Errors raised while writing a cart.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Serialization failed.
    #[error("failed to serialize cart: {0}")]
    Json(#[from] serde_json::Error),

    /// A price could not be written as a finite JSON number.
    #[error("price for item {0} is not representable as a JSON number")]
    Price(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredLineItem {
    id: String,
    name: String,
    price: Number,
    quantity: Number,
}

/// Serialize a cart into its persisted form.
///
/// Whole prices are written as integers (`299`), others as decimals (`12.5`). Decimal prices
/// pass through an `f64`, so they survive a round trip exactly up to 2^53 minor units; whole
/// prices are exact across the full `i64` range.
///
/// # Errors
///
/// Returns an [`EncodeError`] if a price cannot be written as a JSON number.
pub fn encode(cart: &Cart) -> Result<String, EncodeError> {
    let stored = cart
        .iter()
        .map(|item| {
            Ok(StoredLineItem {
                id: item.id().to_string(),
                name: item.name().to_string(),
                price: price_number(item)?,
                quantity: Number::from(item.quantity().get()),
            })
        })
        .collect::<Result<Vec<_>, EncodeError>>()?;

    Ok(serde_json::to_string(&stored)?)
}

fn price_number(item: &LineItem) -> Result<Number, EncodeError> {
    let minor_units = item.price_minor();

    if minor_units % 100 == 0 {
        return Ok(Number::from(minor_units / 100));
    }

    to_decimal(minor_units)
        .to_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| EncodeError::Price(item.id().to_string()))
}

/// Deserialize a persisted cart, validating every entry.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first problem found.
pub fn decode(raw: &str) -> Result<Cart, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(DecodeError::Json)?;

    let Value::Array(entries) = value else {
        return Err(DecodeError::NotAnArray);
    };

    let mut seen = FxHashSet::default();
    let mut items = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let stored: StoredLineItem =
            serde_json::from_value(entry).map_err(|source| DecodeError::Entry { index, source })?;

        let price = parse_price(&stored.price).ok_or_else(|| DecodeError::InvalidPrice {
            index,
            price: stored.price.to_string(),
        })?;

        let quantity = stored
            .quantity
            .as_u64()
            .and_then(|quantity| u32::try_from(quantity).ok())
            .and_then(NonZeroU32::new)
            .ok_or_else(|| DecodeError::InvalidQuantity {
                index,
                quantity: stored.quantity.to_string(),
            })?;

        if !seen.insert(stored.id.clone()) {
            return Err(DecodeError::DuplicateId {
                index,
                id: stored.id,
            });
        }

        items.push(LineItem::new(stored.id, stored.name, price, quantity));
    }

    Ok(Cart::from_items(items))
}

fn parse_price(number: &Number) -> Option<i64> {
    let amount = match number.as_i64() {
        Some(whole) => Decimal::from(whole),
        None => Decimal::from_f64(number.as_f64()?)?,
    };

    if amount.is_sign_negative() {
        return None;
    }

    to_minor_units(amount)
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn encode_writes_only_persisted_fields() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("watch", "Avance Watch", Money::from_minor(29_900, USD))?;
        cart.add_item("watch", "Avance Watch", Money::from_minor(29_900, USD))?;

        assert_eq!(
            encode(&cart)?,
            r#"[{"id":"watch","name":"Avance Watch","price":299,"quantity":2}]"#
        );

        Ok(())
    }

    #[test]
    fn encode_writes_fractional_prices_as_decimals() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("band", "Avance Band", Money::from_minor(1_250, USD))?;

        assert_eq!(
            encode(&cart)?,
            r#"[{"id":"band","name":"Avance Band","price":12.5,"quantity":1}]"#
        );

        Ok(())
    }

    #[test]
    fn encode_keeps_cents_on_large_fractional_prices() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item("vault", "Vault", Money::from_minor(123_456_789_012, USD))?;

        let raw = encode(&cart)?;
        let restored = decode(&raw)?;

        assert_eq!(
            raw,
            r#"[{"id":"vault","name":"Vault","price":1234567890.12,"quantity":1}]"#
        );
        assert_eq!(restored, cart);

        Ok(())
    }

    #[test]
    fn encode_empty_cart_is_empty_array() -> TestResult {
        assert_eq!(encode(&Cart::new())?, "[]");

        Ok(())
    }

    #[test]
    fn decode_reads_entries_in_order() -> TestResult {
        let cart = decode(
            r#"[{"id":"ring","name":"Avance Rings","price":150,"quantity":3},
                {"id":"band","name":"Avance Band","price":79.99,"quantity":1}]"#,
        )?;

        let ring = cart.get("ring").ok_or("missing ring")?;
        let band = cart.get("band").ok_or("missing band")?;

        assert_eq!(cart.len(), 2);
        assert_eq!(ring.price_minor(), 15_000);
        assert_eq!(ring.quantity().get(), 3);
        assert_eq!(band.price_minor(), 7_999);

        Ok(())
    }

    #[test]
    fn decode_rounds_half_cent_prices_up() -> TestResult {
        let cart = decode(
            r#"[{"id":"a","name":"A","price":0.125,"quantity":1},
                {"id":"b","name":"B","price":12.345,"quantity":1}]"#,
        )?;

        assert_eq!(cart.get("a").ok_or("missing a")?.price_minor(), 13);
        assert_eq!(cart.get("b").ok_or("missing b")?.price_minor(), 1_235);

        Ok(())
    }

    #[test]
    fn decode_ignores_display_fields() -> TestResult {
        let cart = decode(
            r#"[{"id":"watch","name":"Avance Watch","price":299,"quantity":1,"image":"/images/reloj1.png"}]"#,
        )?;

        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn decode_rejects_invalid_json() {
        assert!(matches!(decode("[{"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn decode_rejects_non_array() {
        assert!(matches!(decode(r#"{"id":"watch"}"#), Err(DecodeError::NotAnArray)));
    }

    #[test]
    fn decode_rejects_missing_fields() {
        let result = decode(r#"[{"id":"watch","price":299,"quantity":1}]"#);

        assert!(matches!(result, Err(DecodeError::Entry { index: 0, .. })));
    }

    #[test]
    fn decode_rejects_zero_quantity() {
        let result = decode(r#"[{"id":"watch","name":"W","price":299,"quantity":0}]"#);

        assert!(matches!(result, Err(DecodeError::InvalidQuantity { index: 0, .. })));
    }

    #[test]
    fn decode_rejects_fractional_quantity() {
        let result = decode(r#"[{"id":"watch","name":"W","price":299,"quantity":1.5}]"#);

        assert!(matches!(result, Err(DecodeError::InvalidQuantity { .. })));
    }

    #[test]
    fn decode_rejects_negative_price() {
        let result = decode(r#"[{"id":"watch","name":"W","price":-1,"quantity":1}]"#);

        assert!(matches!(result, Err(DecodeError::InvalidPrice { index: 0, .. })));
    }

    #[test]
    fn decode_rejects_duplicate_ids() {
        let result = decode(
            r#"[{"id":"watch","name":"W","price":1,"quantity":1},
                {"id":"watch","name":"W","price":1,"quantity":2}]"#,
        );

        assert!(matches!(
            result,
            Err(DecodeError::DuplicateId { index: 1, id }) if id == "watch"
        ));
    }
}
