use serde::Serialize;
use serde_json::Value;

use crate::{
    LauncherError, SettingsStore, ALLOW_SILENT_UPDATES_KEY, SETTINGS_STORE, TRAY_ACTIVE_KEY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrayPreference {
    pub(crate) tray_active: bool,
    pub(crate) allow_silent_updates: bool,
}

impl Default for TrayPreference {
    fn default() -> Self {
        Self {
            tray_active: true,
            allow_silent_updates: false,
        }
    }
}

impl TrayPreference {
    /// Reads both flags, falling back to the defaults for absent or unreadable values.
    pub(crate) fn load(store: &SettingsStore) -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: bool| match store.get_bool(SETTINGS_STORE, key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(error) => {
                tracing::warn!("failed to read preference '{key}', using default: {error}");
                default
            }
        };

        Self {
            tray_active: read(TRAY_ACTIVE_KEY, defaults.tray_active),
            allow_silent_updates: read(ALLOW_SILENT_UPDATES_KEY, defaults.allow_silent_updates),
        }
    }
}

pub(crate) fn persist_tray_active(
    store: &SettingsStore,
    active: bool,
) -> Result<(), LauncherError> {
    store.set(SETTINGS_STORE, TRAY_ACTIVE_KEY, Value::Bool(active))
}

pub(crate) fn persist_allow_silent_updates(
    store: &SettingsStore,
    allowed: bool,
) -> Result<(), LauncherError> {
    store.set(SETTINGS_STORE, ALLOW_SILENT_UPDATES_KEY, Value::Bool(allowed))
}
