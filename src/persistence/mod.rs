//! Key-value persistence
//!
//! The game only ever stores a couple of strings (high score, optional tuning
//! override), so storage is an injected get/set capability:
//! - `MemoryStore` for native runs and tests
//! - `LocalStore` backed by browser LocalStorage on wasm32

use std::collections::HashMap;

/// Minimal string storage the session depends on
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-process store, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls seen so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage. Missing storage (private mode, sandboxed iframe)
/// degrades to reads returning `None` and writes being dropped.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("LocalStorage write failed for {}", key);
                }
            }
            None => log::warn!("LocalStorage unavailable, {} not saved", key),
        }
    }
}
