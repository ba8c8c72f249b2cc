use tauri::{AppHandle, Manager};

use crate::{append_tray_log, tray_actions, tray_setup::LauncherReconciler, window_actions};

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ShowLauncher) => {
            window_actions::show_main_window(app_handle, append_tray_log)
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            let Some(reconciler) = app_handle.try_state::<LauncherReconciler>() else {
                append_tray_log("tray quit before reconciler was ready, exiting");
                app_handle.exit(0);
                return;
            };
            reconciler.request_quit();
        }
        None => append_tray_log(&format!("ignored unknown tray menu id: {menu_id}")),
    }
}
