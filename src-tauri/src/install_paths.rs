use std::path::{Path, PathBuf};

use tauri::{AppHandle, Manager};

use crate::{LauncherConfig, LauncherError};

pub(crate) fn default_documents_root(app_handle: &AppHandle) -> Option<PathBuf> {
    app_handle
        .path()
        .document_dir()
        .ok()
        .or_else(|| home::home_dir().map(|home| home.join("Documents")))
}

pub(crate) fn default_install_root(
    documents_root: Option<&Path>,
    config: &LauncherConfig,
) -> Option<PathBuf> {
    documents_root.map(|root| root.join(&config.install_subfolder))
}

/// Install destination for a job: the override (or the default root) plus the
/// product directory. Blank overrides count as absent.
pub(crate) fn resolve_target_path(
    documents_root: Option<&Path>,
    user_override: Option<&str>,
    config: &LauncherConfig,
) -> Result<PathBuf, LauncherError> {
    let base = match user_override.map(str::trim).filter(|value| !value.is_empty()) {
        Some(selected) => PathBuf::from(selected),
        None => default_install_root(documents_root, config).ok_or(LauncherError::PathResolution)?,
    };

    Ok(base.join(&config.product_dir))
}

pub(crate) fn archive_path_for(destination_dir: &Path, config: &LauncherConfig) -> PathBuf {
    destination_dir.join(config.archive_file_name())
}
