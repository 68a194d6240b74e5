//! Avance Cart prelude.
//!
//! Convenience exports for common library consumers.

#[cfg(target_arch = "wasm32")]
pub use crate::storage::WebStorage;
pub use crate::{
    cart::{Cart, CartChange, CartError},
    catalog::{Catalog, CatalogError, FALLBACK_THUMBNAIL},
    codec::{CART_STORAGE_KEY, DecodeError, EncodeError},
    items::{DisplayLineItem, LineItem},
    observer::{CartBadge, CartObserver, NoopObserver},
    pricing::{TotalPriceError, format_minor, format_money},
    products::{Product, ProductKey},
    storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
    store::{CartStore, StoreError},
};
