//! Catalog
//!
//! Static, read-only product metadata keyed by product id. The cart never mutates it; it is
//! only consulted to build line items from products and to enrich line items for display.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    items::{DisplayLineItem, LineItem},
    pricing::to_minor_units,
    products::{Product, ProductKey},
};

/// Built-in Avance catalog fixture.
const AVANCE_CATALOG_YAML: &str = include_str!("../fixtures/products/avance.yml");

/// Image shown for line items whose id is not in the catalog.
pub const FALLBACK_THUMBNAIL: &str = "/images/reloj1.png";

/// Catalog parsing errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error
    #[error("Failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A product is priced in a currency other than the cart's
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// A product has no images to display
    #[error("Product {0} has no images")]
    MissingImages(String),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: String,

    name: String,

    /// Product price (e.g., "299 USD")
    price: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    features: Vec<String>,

    images: Vec<String>,

    /// Defaults to the first carousel image
    #[serde(default)]
    thumbnail: Option<String>,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        let thumbnail = match fixture.thumbnail {
            Some(thumbnail) => thumbnail,
            None => fixture
                .images
                .first()
                .cloned()
                .ok_or_else(|| CatalogError::MissingImages(fixture.id.clone()))?,
        };

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            price: Money::from_minor(minor_units, currency),
            description: fixture.description,
            features: fixture.features,
            images: fixture.images,
            thumbnail,
        })
    }
}

/// Parse price string (e.g., "2.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    let minor_units =
        to_minor_units(amount).ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(CatalogError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Product catalog
#[derive(Debug)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    keys: FxHashMap<String, ProductKey>,
    order: Vec<ProductKey>,
    currency: &'static Currency,
}

impl Catalog {
    /// Load the built-in Avance catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture is invalid.
    pub fn avance() -> Result<Self, CatalogError> {
        Self::from_yaml(AVANCE_CATALOG_YAML)
    }

    /// Parse a catalog from a YAML fixture.
    ///
    /// Products keep their declaration order. Every price must be in USD, the currency carts are
    /// kept in.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is invalid or not in USD, an id is
    /// repeated or a product has no image.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let mut products = SlotMap::with_key();
        let mut keys = FxHashMap::default();
        let mut order = Vec::with_capacity(fixture.products.len());

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;
            let product_currency = product.price.currency();

            if product_currency != USD {
                return Err(CatalogError::CurrencyMismatch(
                    USD.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }

            if keys.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }

            let id = product.id.clone();
            let key = products.insert(product);

            keys.insert(id, key);
            order.push(key);
        }

        Ok(Self {
            products,
            keys,
            order,
            currency: USD,
        })
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.keys
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Iterate over products in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency shared by every product
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Thumbnail for a product id, or [`FALLBACK_THUMBNAIL`] if the id is unknown.
    pub fn thumbnail_for(&self, id: &str) -> &str {
        self.get(id)
            .map_or(FALLBACK_THUMBNAIL, |product| product.thumbnail.as_str())
    }

    /// Enrich a line item with catalog-derived display fields.
    pub fn enrich<'a>(&'a self, item: &'a LineItem) -> DisplayLineItem<'a> {
        DisplayLineItem::new(item, self.thumbnail_for(item.id()), self.currency)
    }
}
