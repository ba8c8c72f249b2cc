use tauri::{Manager, WindowEvent};

use crate::{
    append_desktop_log, archive_path_for, install_marker, install_paths, logging,
    settings_store::PluginStoreBackend,
    tray_setup::{LauncherReconciler, TauriShellHost},
    window_actions,
    window_placement::MonitorMemory,
    InstallOrchestrator, LauncherConfig, SettingsStore, TrayPreference, DESKTOP_LOG_FILE,
    MAIN_WINDOW_LABEL,
};

fn warn_on_partial_archive(app_handle: &tauri::AppHandle, config: &LauncherConfig) {
    let documents_root = install_paths::default_documents_root(app_handle);
    let Ok(destination_dir) =
        install_paths::resolve_target_path(documents_root.as_deref(), None, config)
    else {
        append_desktop_log("no documents directory, skipping archive check");
        return;
    };

    let archive_path = archive_path_for(&destination_dir, config);
    if let install_marker::ArchiveState::Partial {
        bytes_on_disk,
        expected_bytes,
    } = install_marker::inspect_archive(&destination_dir, &archive_path)
    {
        tracing::warn!(
            archive = %archive_path.display(),
            bytes_on_disk,
            expected_bytes = ?expected_bytes,
            "previous download did not finish"
        );
    }
}

pub(crate) fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            append_desktop_log("second launcher instance started, focusing main window");
            window_actions::show_main_window(app, append_desktop_log);
        }))
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(InstallOrchestrator::default())
        .manage(MonitorMemory::default())
        .invoke_handler(tauri::generate_handler![
            crate::launcher_commands::launcher_resolve_target_path,
            crate::launcher_commands::launcher_pick_install_folder,
            crate::launcher_commands::launcher_begin_install,
            crate::launcher_commands::launcher_get_install_state,
            crate::launcher_commands::launcher_inspect_archive,
            crate::launcher_commands::launcher_get_preferences,
            crate::launcher_commands::launcher_set_tray_active,
            crate::launcher_commands::launcher_set_allow_silent_updates,
            crate::launcher_commands::launcher_show,
            crate::launcher_commands::launcher_hide,
            crate::launcher_commands::launcher_minimize,
            crate::launcher_commands::launcher_request_close,
        ])
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            if let WindowEvent::CloseRequested { api, .. } = event {
                let Some(reconciler) = window.app_handle().try_state::<LauncherReconciler>()
                else {
                    return;
                };
                if reconciler.intercept_window_close() {
                    api.prevent_close();
                }
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            logging::init_tracing(&logging::resolve_desktop_log_path(
                app_handle.path().app_log_dir().ok(),
                DESKTOP_LOG_FILE,
            ));
            append_desktop_log("launcher process starting");
            let config = LauncherConfig::from_env();
            append_desktop_log(&format!(
                "download source: {} (archive {})",
                config.download_url,
                config.archive_file_name()
            ));

            let store = SettingsStore::new(PluginStoreBackend::new(app_handle.clone()));
            let preference = TrayPreference::load(&store);

            let reconciler =
                LauncherReconciler::new(TauriShellHost::new(app_handle.clone()), preference);
            if let Err(error) = reconciler.reconcile(preference.tray_active) {
                tracing::warn!("failed to initialize tray: {error}");
            }

            warn_on_partial_archive(&app_handle, &config);

            app.manage(store);
            app.manage(reconciler);
            app.manage(config);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running launcher application");
}
