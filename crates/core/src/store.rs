//! Cart Store
//!
//! The single authoritative cart for a page. It is loaded once from durable storage, mutated
//! only through its methods, and written back after every mutation with no batching, so the
//! stored copy never lags by more than one operation.
//!
//! Two stores on the same storage (two tabs) do not coordinate: each keeps its own copy and
//! the last one to persist wins. [`CartStore::reload`] re-reads storage for callers that learn
//! of an external write.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartChange, CartError},
    catalog::Catalog,
    codec::{CART_STORAGE_KEY, DecodeError, EncodeError, decode, encode},
    items::DisplayLineItem,
    observer::{CartObserver, NoopObserver},
    pricing::TotalPriceError,
    products::Product,
    storage::{CartStorage, StorageError},
};

/// Cart store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Durable storage could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The persisted cart is malformed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The cart could not be serialized.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The mutation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Cart store over a storage backend, notifying an observer of every change.
#[derive(Debug)]
pub struct CartStore<S, O = NoopObserver> {
    storage: S,
    cart: Cart,
    observer: O,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart from storage. A missing slot is an empty cart.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Storage`]: storage could not be read.
    /// - [`StoreError::Decode`]: the stored value is malformed.
    pub fn load(storage: S) -> Result<Self, StoreError> {
        let cart = read_cart(&storage)?;

        Ok(Self::from_parts(storage, cart))
    }

    /// Load the cart, replacing a malformed stored value with an empty cart.
    ///
    /// The corrupt value is overwritten with `[]` immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if storage could not be read or reset.
    pub fn load_or_reset(storage: S) -> Result<Self, StoreError> {
        let cart = match read_cart(&storage) {
            Ok(cart) => cart,
            Err(StoreError::Decode(error)) => {
                warn!(%error, key = CART_STORAGE_KEY, "discarding malformed persisted cart");

                let cart = Cart::new();
                storage.set(CART_STORAGE_KEY, &encode(&cart)?)?;

                cart
            }
            Err(error) => return Err(error),
        };

        Ok(Self::from_parts(storage, cart))
    }

    fn from_parts(storage: S, cart: Cart) -> Self {
        Self {
            storage,
            cart,
            observer: NoopObserver,
        }
    }
}

fn read_cart<S: CartStorage>(storage: &S) -> Result<Cart, StoreError> {
    let cart = match storage.get(CART_STORAGE_KEY)? {
        Some(raw) => decode(&raw)?,
        None => Cart::new(),
    };

    debug!(items = cart.len(), count = cart.item_count(), "loaded cart");

    Ok(cart)
}

impl<S: CartStorage, O: CartObserver> CartStore<S, O> {
    /// Attach an observer, replacing the current one.
    ///
    /// The new observer is immediately sent [`CartChange::Loaded`] with the current cart.
    pub fn with_observer<P: CartObserver>(self, mut observer: P) -> CartStore<S, P> {
        observer.on_change(&self.cart, &CartChange::Loaded);

        CartStore {
            storage: self.storage,
            cart: self.cart,
            observer,
        }
    }

    /// Add one unit of an item, persisting the result.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Cart`]: the item was rejected; nothing changed or was written.
    /// - [`StoreError::Storage`] / [`StoreError::Encode`]: the mutation was applied in memory
    ///   but could not be persisted.
    pub fn add_item(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money<'_, Currency>,
    ) -> Result<CartChange, StoreError> {
        let change = self.cart.add_item(id, name, price)?;

        self.commit(change)
    }

    /// Add one unit of a catalog product, persisting the result.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_item`].
    pub fn add_product(&mut self, product: &Product) -> Result<CartChange, StoreError> {
        let change = self.cart.add_product(product)?;

        self.commit(change)
    }

    /// Change a line's quantity by `delta`, removing it at zero, and persist.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_item`].
    pub fn update_quantity(&mut self, id: &str, delta: i64) -> Result<CartChange, StoreError> {
        let change = self.cart.update_quantity(id, delta)?;

        self.commit(change)
    }

    /// Shorthand for `update_quantity(id, 1)`.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_item`].
    pub fn increment(&mut self, id: &str) -> Result<CartChange, StoreError> {
        self.update_quantity(id, 1)
    }

    /// Shorthand for `update_quantity(id, -1)`.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_item`].
    pub fn decrement(&mut self, id: &str) -> Result<CartChange, StoreError> {
        self.update_quantity(id, -1)
    }

    /// Remove a line if present, and persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] or [`StoreError::Encode`] if the cart could not be
    /// persisted.
    pub fn remove_item(&mut self, id: &str) -> Result<CartChange, StoreError> {
        let change = self.cart.remove_item(id);

        self.commit(change)
    }

    /// Empty the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] or [`StoreError::Encode`] if the cart could not be
    /// persisted.
    pub fn clear(&mut self) -> Result<CartChange, StoreError> {
        let change = self.cart.clear();

        self.commit(change)
    }

    /// Write the current cart to storage, overwriting the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] or [`StoreError::Encode`] if the write fails.
    pub fn persist(&self) -> Result<(), StoreError> {
        let raw = encode(&self.cart)?;

        self.storage.set(CART_STORAGE_KEY, &raw)?;

        debug!(items = self.cart.len(), bytes = raw.len(), "persisted cart");

        Ok(())
    }

    /// Replace the in-memory cart with what is currently in storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] or [`StoreError::Decode`]; the in-memory cart is kept
    /// on error.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.cart = read_cart(&self.storage)?;
        self.observer.on_change(&self.cart, &CartChange::Loaded);

        Ok(())
    }

    fn commit(&mut self, change: CartChange) -> Result<CartChange, StoreError> {
        debug!(?change, count = self.cart.item_count(), "cart changed");

        let persisted = self.persist();

        self.observer.on_change(&self.cart, &change);

        persisted.map(|()| change)
    }

    /// The current cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Calculate the cart subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the total overflows.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        self.cart.subtotal()
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Lines enriched with catalog display fields, in cart order.
    pub fn display_items<'a>(&'a self, catalog: &'a Catalog) -> Vec<DisplayLineItem<'a>> {
        self.cart.iter().map(|item| catalog.enrich(item)).collect()
    }

    /// The attached observer
    pub fn observer(&self) -> &O {
        &self.observer
    }
}
