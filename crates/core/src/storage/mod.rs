//! Durable storage
//!
//! A per-profile key-value slot store, modelled on the browser's `localStorage`: string keys,
//! string values, synchronous reads and writes, last writer wins.

use std::io;

use thiserror::Error;

mod file;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use file::FileStorage;
pub use memory::MemoryStorage;
#[cfg(target_arch = "wasm32")]
pub use web::WebStorage;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refused access (disabled by the user or browser policy).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// IO error reading or writing a slot
    #[error("storage IO error for key {key}: {source}")]
    Io {
        /// Slot key
        key: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

/// Key-value storage backing a cart.
///
/// Methods take `&self`; implementations use interior mutability where they need it.
pub trait CartStorage {
    /// Read a slot. Returns `Ok(None)` if the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
