#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod download_transport;
mod install_marker;
mod install_orchestrator;
mod install_paths;
mod install_progress;
mod install_status;
mod launcher_commands;
mod launcher_config;
mod launcher_error;
mod logging;
mod settings_store;
mod tray_actions;
mod tray_menu_handler;
mod tray_preference;
mod tray_reconciler;
mod tray_setup;
mod window_actions;
mod window_placement;

pub(crate) use app_constants::*;
pub(crate) use app_types::{AtomicFlagGuard, LauncherBridgeResult};
pub(crate) use download_transport::HttpDownloadTransport;
pub(crate) use install_orchestrator::{
    InstallEvent, InstallJob, InstallOrchestrator, InstallSnapshot,
};
pub(crate) use install_paths::archive_path_for;
pub(crate) use install_progress::ProgressTracker;
pub(crate) use install_status::{InstallStateMachine, InstallStatus, InstallTrigger};
pub(crate) use launcher_config::LauncherConfig;
pub(crate) use launcher_error::{InstallFailure, LauncherError, TransportError};
pub(crate) use logging::{append_desktop_log, append_install_log, append_tray_log};
pub(crate) use settings_store::SettingsStore;
pub(crate) use tray_preference::TrayPreference;
pub(crate) use tray_reconciler::TrayReconciler;

fn main() {
    app_runtime::run();
}
