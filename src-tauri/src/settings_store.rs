use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tauri::AppHandle;
use tauri_plugin_store::StoreExt;

use crate::LauncherError;

pub(crate) fn store_file_name(store: &str) -> String {
    format!("{store}.json")
}

/// Raw key/value access to named stores. Errors are plain messages; the
/// `SettingsStore` wrapper turns them into `LauncherError`s.
pub(crate) trait StoreBackend: Send + Sync {
    fn get(&self, store: &str, key: &str) -> Result<Option<Value>, String>;
    fn set(&self, store: &str, key: &str, value: Value) -> Result<(), String>;
}

/// Stores kept by `tauri-plugin-store`, shared with the web UI.
pub(crate) struct PluginStoreBackend {
    app_handle: AppHandle,
}

impl PluginStoreBackend {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl StoreBackend for PluginStoreBackend {
    fn get(&self, store: &str, key: &str) -> Result<Option<Value>, String> {
        let handle = self
            .app_handle
            .store(store_file_name(store))
            .map_err(|error| format!("Failed to open settings store: {error}"))?;
        Ok(handle.get(key))
    }

    fn set(&self, store: &str, key: &str, value: Value) -> Result<(), String> {
        let handle = self
            .app_handle
            .store(store_file_name(store))
            .map_err(|error| format!("Failed to open settings store: {error}"))?;
        handle.set(key, value);
        handle
            .save()
            .map_err(|error| format!("Failed to save settings store: {error}"))
    }
}

/// Durable key/value settings, namespaced by store name.
///
/// All reads and writes go through one lock so a read-modify-write of a key
/// never interleaves with another one.
pub(crate) struct SettingsStore {
    backend: Box<dyn StoreBackend>,
    lock: Mutex<()>,
}

impl SettingsStore {
    pub(crate) fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            lock: Mutex::new(()),
        }
    }

    pub(crate) fn get(&self, store: &str, key: &str) -> Result<Option<Value>, LauncherError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.backend
            .get(store, key)
            .map_err(|message| LauncherError::SettingsRead {
                store: store.to_string(),
                message,
            })
    }

    pub(crate) fn get_bool(&self, store: &str, key: &str) -> Result<Option<bool>, LauncherError> {
        Ok(self.get(store, key)?.and_then(|value| value.as_bool()))
    }

    pub(crate) fn set(&self, store: &str, key: &str, value: Value) -> Result<(), LauncherError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.backend
            .set(store, key, value)
            .map_err(|message| LauncherError::Persistence {
                store: store.to_string(),
                message,
            })
    }
}
