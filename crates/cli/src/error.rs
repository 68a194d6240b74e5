//! CLI errors

use std::io;

use avance_cart::{catalog::CatalogError, pricing::TotalPriceError, store::StoreError};
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Errors surfaced by the `avance` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The built-in catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The cart could not be loaded, changed or saved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A cart total overflowed.
    #[error(transparent)]
    Total(#[from] TotalPriceError),

    /// No catalog product has this id.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),
}
