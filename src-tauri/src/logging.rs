use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::LOG_FILTER_ENV;

pub(crate) fn resolve_desktop_log_path(log_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    log_dir
        .or_else(|| home::home_dir().map(|home| home.join(".eljuego-launcher").join("logs")))
        .unwrap_or_else(std::env::temp_dir)
        .join(file_name)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber: stderr plus an append-only log file. A file
/// that cannot be opened only disables the file layer.
pub(crate) fn init_tracing(log_path: &Path) {
    let file = log_path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| OpenOptions::new().create(true).append(true).open(log_path));

    let file_layer = match file {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        ),
        Err(error) => {
            eprintln!(
                "launcher log file {} unavailable: {error}",
                log_path.display()
            );
            None
        }
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
}

pub(crate) fn append_desktop_log(message: &str) {
    tracing::info!(target: "launcher::desktop", "{message}");
}

pub(crate) fn append_install_log(message: &str) {
    tracing::info!(target: "launcher::install", "{message}");
}

pub(crate) fn append_tray_log(message: &str) {
    tracing::info!(target: "launcher::tray", "{message}");
}
