//! Cart Observers
//!
//! Every surface that shows cart state (header badge, slide-out panel, cart page) observes a
//! single [`CartStore`](crate::store::CartStore) instead of reading storage on its own.

use crate::cart::{Cart, CartChange};

/// Receives the cart after every load and mutation.
pub trait CartObserver {
    /// Called with the current cart and the change that produced it.
    fn on_change(&mut self, cart: &Cart, change: &CartChange);
}

/// Observer that ignores every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn on_change(&mut self, _cart: &Cart, _change: &CartChange) {}
}

impl<A: CartObserver, B: CartObserver> CartObserver for (A, B) {
    fn on_change(&mut self, cart: &Cart, change: &CartChange) {
        self.0.on_change(cart, change);
        self.1.on_change(cart, change);
    }
}

/// Header cart badge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CartBadge {
    count: u64,
}

impl CartBadge {
    /// Badge for the current contents of a cart.
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            count: cart.item_count(),
        }
    }

    /// Total quantity across all lines
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Text to show, or `None` when the badge is hidden.
    pub fn label(&self) -> Option<String> {
        (self.count > 0).then(|| self.count.to_string())
    }
}

impl CartObserver for CartBadge {
    fn on_change(&mut self, cart: &Cart, _change: &CartChange) {
        *self = Self::from_cart(cart);
    }
}
