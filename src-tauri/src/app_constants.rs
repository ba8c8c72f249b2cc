pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const TRAY_ID: &str = "LAUNCHER_TRAY";
pub(crate) const TRAY_TOOLTIP: &str = "eljuego launcher";
pub(crate) const TRAY_ICON_RESOURCE: &str = "icons/tray.png";

pub(crate) const SETTINGS_STORE: &str = "settings";
pub(crate) const TRAY_ACTIVE_KEY: &str = "trayActive";
pub(crate) const ALLOW_SILENT_UPDATES_KEY: &str = "allowSilentUpdates";

pub(crate) const DEFAULT_DOWNLOAD_URL: &str = "http://127.0.0.1:3000/api/videogame";
pub(crate) const DEFAULT_ARCHIVE_VERSION: &str = "0.0.1";
pub(crate) const DEFAULT_PRODUCT_DIR: &str = "eljuego";
pub(crate) const DEFAULT_INSTALL_SUBFOLDER: &str = "carpeta";
pub(crate) const DOWNLOAD_MARKER_FILE: &str = ".launcher-download.json";

pub(crate) const DOWNLOAD_URL_ENV: &str = "LAUNCHER_DOWNLOAD_URL";
pub(crate) const ARCHIVE_VERSION_ENV: &str = "LAUNCHER_ARCHIVE_VERSION";
pub(crate) const PRODUCT_DIR_ENV: &str = "LAUNCHER_PRODUCT_DIR";
pub(crate) const INSTALL_SUBFOLDER_ENV: &str = "LAUNCHER_INSTALL_SUBFOLDER";
pub(crate) const LOG_FILTER_ENV: &str = "LAUNCHER_LOG";

pub(crate) const DESKTOP_LOG_FILE: &str = "launcher.log";
pub(crate) const INSTALL_EVENT: &str = "launcher://install";
pub(crate) const LAUNCHER_SHOWN_EVENT: &str = "launcher://shown";
