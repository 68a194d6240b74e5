//! Browser `localStorage`

use web_sys::Storage;

use super::{CartStorage, StorageError};

/// The current window's `localStorage`.
#[derive(Debug, Clone)]
pub struct WebStorage {
    storage: Storage,
}

impl WebStorage {
    /// Open `window.localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if there is no window or storage is disabled.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;

        Ok(Self { storage })
    }
}

impl CartStorage for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }
}
