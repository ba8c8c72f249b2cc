use std::path::PathBuf;

use tauri::{ipc::Channel, AppHandle, Emitter, Manager};
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;

use crate::{
    append_desktop_log, append_install_log, archive_path_for, install_marker, install_paths,
    tray_setup::LauncherReconciler, window_actions, HttpDownloadTransport, InstallEvent,
    InstallJob, InstallOrchestrator, InstallSnapshot, LauncherBridgeResult, LauncherConfig,
    LauncherError, SettingsStore, TrayPreference, INSTALL_EVENT,
};

fn resolve_target_path(
    app_handle: &AppHandle,
    user_override: Option<&str>,
) -> Result<PathBuf, LauncherError> {
    let config = app_handle.state::<LauncherConfig>();
    let documents_root = install_paths::default_documents_root(app_handle);
    install_paths::resolve_target_path(documents_root.as_deref(), user_override, &config)
}

#[tauri::command]
pub(crate) fn launcher_resolve_target_path(
    app_handle: AppHandle,
    user_override: Option<String>,
) -> Result<PathBuf, String> {
    resolve_target_path(&app_handle, user_override.as_deref()).map_err(|error| error.to_string())
}

#[tauri::command]
pub(crate) async fn launcher_pick_install_folder(app_handle: AppHandle) -> Option<String> {
    let (sender, receiver) = oneshot::channel();
    app_handle.dialog().file().pick_folder(move |picked| {
        let _ = sender.send(picked.map(|path| path.to_string()));
    });
    let picked = await_picked_folder(receiver).await;
    if picked.is_none() {
        append_desktop_log("install folder selection cancelled");
    }
    picked
}

/// A dialog that goes away without answering counts as a cancelled pick.
async fn await_picked_folder(receiver: oneshot::Receiver<Option<String>>) -> Option<String> {
    receiver.await.ok().flatten()
}

/// Streams install events to `on_event` and the global `launcher://install`
/// channel until the job reaches a terminal status.
#[tauri::command]
pub(crate) async fn launcher_begin_install(
    app_handle: AppHandle,
    user_override: Option<String>,
    on_event: Channel<InstallEvent>,
) -> Result<InstallSnapshot, String> {
    let destination_dir = resolve_target_path(&app_handle, user_override.as_deref())
        .map_err(|error| error.to_string())?;
    let job = {
        let config = app_handle.state::<LauncherConfig>();
        InstallJob::new(destination_dir, &config)
    };
    let transport = HttpDownloadTransport::new().map_err(|error| error.to_string())?;
    let orchestrator = app_handle.state::<InstallOrchestrator>();

    orchestrator
        .begin_install(job, &transport, |event| {
            if let Err(error) = on_event.send(event.clone()) {
                append_install_log(&format!("failed to deliver install event: {error}"));
            }
            if let Err(error) = app_handle.emit(INSTALL_EVENT, event.clone()) {
                append_install_log(&format!("failed to emit {INSTALL_EVENT}: {error}"));
            }
        })
        .await
        .map_err(|error| error.to_string())
}

#[tauri::command]
pub(crate) fn launcher_get_install_state(app_handle: AppHandle) -> InstallSnapshot {
    app_handle.state::<InstallOrchestrator>().snapshot()
}

#[tauri::command]
pub(crate) fn launcher_inspect_archive(
    app_handle: AppHandle,
    user_override: Option<String>,
) -> Result<install_marker::ArchiveState, String> {
    let destination_dir = resolve_target_path(&app_handle, user_override.as_deref())
        .map_err(|error| error.to_string())?;
    let archive_path = archive_path_for(&destination_dir, &app_handle.state::<LauncherConfig>());
    Ok(install_marker::inspect_archive(
        &destination_dir,
        &archive_path,
    ))
}

#[tauri::command]
pub(crate) fn launcher_get_preferences(app_handle: AppHandle) -> TrayPreference {
    app_handle.state::<LauncherReconciler>().preference()
}

#[tauri::command]
pub(crate) fn launcher_set_tray_active(app_handle: AppHandle, active: bool) -> LauncherBridgeResult {
    let reconciler = app_handle.state::<LauncherReconciler>();
    let store = app_handle.state::<SettingsStore>();
    LauncherBridgeResult::with_warnings(reconciler.toggle_preference(active, &store))
}

#[tauri::command]
pub(crate) fn launcher_set_allow_silent_updates(
    app_handle: AppHandle,
    allowed: bool,
) -> LauncherBridgeResult {
    let reconciler = app_handle.state::<LauncherReconciler>();
    let store = app_handle.state::<SettingsStore>();
    match reconciler.set_allow_silent_updates(allowed, &store) {
        Ok(()) => LauncherBridgeResult::ok(),
        Err(error) => LauncherBridgeResult::with_warnings(vec![error]),
    }
}

#[tauri::command]
pub(crate) fn launcher_show(app_handle: AppHandle) {
    window_actions::show_main_window(&app_handle, append_desktop_log);
}

#[tauri::command]
pub(crate) fn launcher_hide(app_handle: AppHandle) {
    window_actions::hide_main_window(&app_handle, append_desktop_log);
}

#[tauri::command]
pub(crate) fn launcher_minimize(app_handle: AppHandle) {
    window_actions::minimize_main_window(&app_handle, append_desktop_log);
}

/// Custom title-bar close button. Hides to the tray or exits, depending on the
/// current tray preference.
#[tauri::command]
pub(crate) fn launcher_request_close(app_handle: AppHandle) -> LauncherBridgeResult {
    let action = app_handle.state::<LauncherReconciler>().on_close_requested();
    append_desktop_log(&format!("close requested: {action:?}"));
    LauncherBridgeResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn picked_folder_is_forwarded() {
        let (sender, receiver) = oneshot::channel();
        sender.send(Some("/games/launcher".to_string())).unwrap();

        assert_eq!(
            await_picked_folder(receiver).await.as_deref(),
            Some("/games/launcher")
        );
    }

    #[tokio::test]
    async fn cancelled_or_dropped_dialog_yields_none() {
        let (sender, receiver) = oneshot::channel();
        sender.send(None).unwrap();
        assert_eq!(await_picked_folder(receiver).await, None);

        let (sender, receiver) = oneshot::channel::<Option<String>>();
        drop(sender);
        assert_eq!(await_picked_folder(receiver).await, None);
    }
}
