//! In-memory storage

use std::sync::{Arc, Mutex, MutexGuard};

use rustc_hash::FxHashMap;

use super::{CartStorage, StorageError};

#[derive(Debug)]
struct MemoryState {
    slots: FxHashMap<String, String>,
    available: bool,
}

/// In-memory slot store.
///
/// Clones share the same slots, so two stores built from clones behave like two browser tabs
/// on one profile.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Create an empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                slots: FxHashMap::default(),
                available: true,
            })),
        }
    }

    /// Toggle availability; while unavailable every call fails with
    /// [`StorageError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.available = available;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        let state = self
            .state
            .lock()
            .map_err(|_err| StorageError::Unavailable("storage lock poisoned".to_string()))?;

        if state.available {
            Ok(state)
        } else {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?
            .slots
            .insert(key.to_string(), value.to_string());

        Ok(())
    }
}
