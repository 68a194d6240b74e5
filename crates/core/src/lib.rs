//! Avance Cart
//!
//! Client-side shopping cart for the Avance storefront: a product catalog, an id-unique list of
//! line items, and a store that mirrors the list into a single durable storage slot.

pub mod cart;
pub mod catalog;
pub mod codec;
pub mod items;
pub mod observer;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod storage;
pub mod store;
