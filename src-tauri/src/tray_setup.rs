use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    path::BaseDirectory,
    tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_tray_log, tray_actions, tray_menu_handler, tray_reconciler::ShellHost, window_actions,
    TrayReconciler, TRAY_ICON_RESOURCE, TRAY_TOOLTIP,
};

pub(crate) type LauncherReconciler = TrayReconciler<TauriShellHost>;

/// `ShellHost` over the running Tauri app.
pub(crate) struct TauriShellHost {
    app_handle: AppHandle,
}

impl TauriShellHost {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn build_menu(&self) -> Result<Menu<tauri::Wry>, String> {
        let app_handle = &self.app_handle;
        let show_item = MenuItem::with_id(
            app_handle,
            tray_actions::TRAY_MENU_SHOW_LAUNCHER,
            "Show Launcher",
            true,
            None::<&str>,
        )
        .map_err(|error| format!("Failed to create tray show menu item: {error}"))?;
        let quit_item = MenuItem::with_id(
            app_handle,
            tray_actions::TRAY_MENU_QUIT,
            "Quit",
            true,
            None::<&str>,
        )
        .map_err(|error| format!("Failed to create tray quit menu item: {error}"))?;
        let separator = PredefinedMenuItem::separator(app_handle)
            .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;

        Menu::with_items(app_handle, &[&show_item, &separator, &quit_item])
            .map_err(|error| format!("Failed to build tray menu: {error}"))
    }

    /// Bundled tray asset, or the window icon when the resource is missing.
    fn resolve_icon(&self) -> Result<Image<'static>, String> {
        let bundled = self
            .app_handle
            .path()
            .resolve(TRAY_ICON_RESOURCE, BaseDirectory::Resource)
            .map_err(|error| error.to_string())
            .and_then(|path| Image::from_path(&path).map_err(|error| error.to_string()));

        match bundled {
            Ok(icon) => Ok(icon),
            Err(error) => {
                append_tray_log(&format!(
                    "tray icon resource {TRAY_ICON_RESOURCE} unavailable, using window icon: {error}"
                ));
                self.app_handle
                    .default_window_icon()
                    .cloned()
                    .map(Image::to_owned)
                    .ok_or_else(|| "No tray icon available".to_string())
            }
        }
    }
}

impl ShellHost for TauriShellHost {
    type Tray = TrayIcon;

    fn find_tray(&self, id: &str) -> Option<TrayIcon> {
        self.app_handle.tray_by_id(id)
    }

    fn create_tray(&self, id: &str) -> Result<TrayIcon, String> {
        let menu = self.build_menu()?;
        let icon = self.resolve_icon()?;

        let tray_builder = TrayIconBuilder::with_id(id)
            .menu(&menu)
            .tooltip(TRAY_TOOLTIP)
            .icon(icon)
            .show_menu_on_left_click(false)
            .on_menu_event(|app, event| {
                tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
            })
            .on_tray_icon_event(|tray, event| {
                if let TrayIconEvent::Click {
                    button: MouseButton::Left,
                    button_state: MouseButtonState::Up,
                    ..
                } = event
                {
                    window_actions::show_main_window(tray.app_handle(), append_tray_log);
                }
            });

        tray_builder
            .build(&self.app_handle)
            .map_err(|error| format!("Failed to create tray icon: {error}"))
    }

    fn refresh_tray_menu(&self, tray: &TrayIcon) -> Result<(), String> {
        let menu = self.build_menu()?;
        tray.set_menu(Some(menu))
            .map_err(|error| format!("Failed to refresh tray menu: {error}"))
    }

    fn close_tray(&self, id: &str, _tray: TrayIcon) -> Result<(), String> {
        if self.app_handle.remove_tray_by_id(id).is_none() {
            append_tray_log(&format!("tray {id} was already gone when closing"));
        }
        Ok(())
    }

    fn hide_main_window(&self) {
        window_actions::hide_main_window(&self.app_handle, append_tray_log);
    }

    fn close_main_window(&self) {
        window_actions::close_main_window(&self.app_handle, append_tray_log);
    }
}
