//! Save/load of run progress
//!
//! A single JSON blob `{level, custom}` under a fixed key. Anything missing or
//! malformed reads as "no saved progress".

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sim::Customization;

/// LocalStorage key for the save blob
pub const SAVE_KEY: &str = "stickhero_save_data_v2";

/// Persisted progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    /// 1-based level reached
    pub level: u32,
    pub custom: Customization,
}

/// String key-value storage (LocalStorage on web)
pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read saved progress. Missing, unreadable or malformed data is `None`.
pub fn load_save(store: &dyn SaveStore) -> Option<SaveData> {
    let json = match store.get(SAVE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Could not read save: {e:#}");
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(save) => Some(save),
        Err(e) => {
            log::warn!("Ignoring malformed save: {e}");
            None
        }
    }
}

/// Write progress
pub fn write_save(store: &dyn SaveStore, save: &SaveData) -> Result<()> {
    let json = serde_json::to_string(save).context("serialize save")?;
    store.set(SAVE_KEY, &json).context("write save")?;
    log::info!("Progress saved (level {})", save.level);
    Ok(())
}

/// Remove saved progress
pub fn clear_save(store: &dyn SaveStore) -> Result<()> {
    store.remove(SAVE_KEY).context("remove save")?;
    log::info!("Saved progress cleared");
    Ok(())
}

/// In-process store for native builds and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// `None` when storage is unavailable (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{e:?}")
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_err)
    }
}
