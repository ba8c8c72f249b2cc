use std::env;

use semver::Version;
use url::Url;

use crate::{
    append_desktop_log, LauncherError, ARCHIVE_VERSION_ENV, DEFAULT_ARCHIVE_VERSION,
    DEFAULT_DOWNLOAD_URL, DEFAULT_INSTALL_SUBFOLDER, DEFAULT_PRODUCT_DIR, DOWNLOAD_URL_ENV,
    INSTALL_SUBFOLDER_ENV, PRODUCT_DIR_ENV,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LauncherConfig {
    pub(crate) download_url: Url,
    pub(crate) archive_version: Version,
    pub(crate) product_dir: String,
    pub(crate) install_subfolder: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            download_url: Url::parse(DEFAULT_DOWNLOAD_URL)
                .expect("default download url is a valid http url"),
            archive_version: Version::parse(DEFAULT_ARCHIVE_VERSION)
                .expect("default archive version is valid semver"),
            product_dir: DEFAULT_PRODUCT_DIR.to_string(),
            install_subfolder: DEFAULT_INSTALL_SUBFOLDER.to_string(),
        }
    }
}

impl LauncherConfig {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an env-like lookup. Overrides that fail validation
    /// are logged and the default is kept.
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let overrides = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(raw) = overrides(DOWNLOAD_URL_ENV) {
            match parse_download_url(&raw) {
                Ok(url) => config.download_url = url,
                Err(error) => append_desktop_log(&format!("{DOWNLOAD_URL_ENV} ignored: {error}")),
            }
        }
        if let Some(raw) = overrides(ARCHIVE_VERSION_ENV) {
            match parse_archive_version(&raw) {
                Ok(version) => config.archive_version = version,
                Err(error) => {
                    append_desktop_log(&format!("{ARCHIVE_VERSION_ENV} ignored: {error}"))
                }
            }
        }
        if let Some(raw) = overrides(PRODUCT_DIR_ENV) {
            match parse_path_segment(&raw) {
                Ok(segment) => config.product_dir = segment,
                Err(error) => append_desktop_log(&format!("{PRODUCT_DIR_ENV} ignored: {error}")),
            }
        }
        if let Some(raw) = overrides(INSTALL_SUBFOLDER_ENV) {
            match parse_path_segment(&raw) {
                Ok(segment) => config.install_subfolder = segment,
                Err(error) => {
                    append_desktop_log(&format!("{INSTALL_SUBFOLDER_ENV} ignored: {error}"))
                }
            }
        }

        config
    }

    pub(crate) fn archive_file_name(&self) -> String {
        format!("{}.zip", self.archive_version)
    }
}

pub(crate) fn parse_download_url(raw: &str) -> Result<Url, LauncherError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|error| LauncherError::InvalidConfig(format!("invalid url '{raw}': {error}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(LauncherError::InvalidConfig(format!(
            "unsupported url scheme '{scheme}', only http/https are allowed"
        ))),
    }
}

pub(crate) fn parse_archive_version(raw: &str) -> Result<Version, LauncherError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).map_err(|error| {
        LauncherError::InvalidConfig(format!("invalid archive version '{raw}': {error}"))
    })
}

fn parse_path_segment(raw: &str) -> Result<String, LauncherError> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(LauncherError::InvalidConfig(format!(
            "'{raw}' must be a single directory name"
        )));
    }
    Ok(trimmed.to_string())
}
