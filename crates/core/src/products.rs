//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Stable catalog id, also used as the cart line id
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Marketing description shown on the detail page
    pub description: String,

    /// Feature bullet points
    pub features: Vec<String>,

    /// Carousel images, in display order
    pub images: Vec<String>,

    /// Image shown next to the product in cart views
    pub thumbnail: String,
}
