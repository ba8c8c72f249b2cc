use tauri::{AppHandle, Emitter, Manager, WebviewWindow};

use crate::{window_placement, LAUNCHER_SHOWN_EVENT, MAIN_WINDOW_LABEL};

fn main_window<F>(app_handle: &AppHandle, action: &str, log: &F) -> Option<WebviewWindow>
where
    F: Fn(&str),
{
    let window = app_handle.get_webview_window(MAIN_WINDOW_LABEL);
    if window.is_none() {
        log(&format!("{action} skipped: main window not found"));
    }
    window
}

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window(app_handle, "show_main_window", &log) else {
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    window_placement::move_to_active_monitor(&window, &log);
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
        return;
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
    if let Err(error) = app_handle.emit(LAUNCHER_SHOWN_EVENT, ()) {
        log(&format!("failed to emit {LAUNCHER_SHOWN_EVENT}: {error}"));
    }
}

pub fn hide_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window(app_handle, "hide_main_window", &log) else {
        return;
    };
    if let Err(error) = window.hide() {
        log(&format!("failed to hide main window: {error}"));
    }
}

pub fn minimize_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window(app_handle, "minimize_main_window", &log) else {
        return;
    };
    if let Err(error) = window.minimize() {
        log(&format!("failed to minimize main window: {error}"));
    }
}

/// Closes the main window for real. Once it is gone the runtime exits because
/// no other windows exist.
pub fn close_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window(app_handle, "close_main_window", &log) else {
        app_handle.exit(0);
        return;
    };
    if let Err(error) = window.close() {
        log(&format!("failed to close main window, exiting: {error}"));
        app_handle.exit(0);
    }
}
