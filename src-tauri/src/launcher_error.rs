use std::{io, path::PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("server answered {url} with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("download stream broke after {bytes_received} bytes: {message}")]
    Stream { bytes_received: u64, message: String },
    #[error("failed to write archive {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    pub(crate) fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }

        Self::Request {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    pub(crate) fn kind(&self) -> InstallErrorKind {
        match self {
            Self::Write { .. } => InstallErrorKind::Filesystem,
            Self::Request { .. } | Self::Status { .. } | Self::Stream { .. } => {
                InstallErrorKind::Transport
            }
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum LauncherError {
    #[error("documents directory is unavailable; choose an install folder")]
    PathResolution,
    #[error("failed to create install directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to read settings store '{store}': {message}")]
    SettingsRead { store: String, message: String },
    #[error("failed to persist settings store '{store}': {message}")]
    Persistence { store: String, message: String },
    #[error("tray icon error: {0}")]
    TrayResource(String),
    #[error("an installation is already running")]
    InstallInProgress,
    #[error("invalid launcher configuration: {0}")]
    InvalidConfig(String),
}

impl LauncherError {
    pub(crate) fn install_failure(&self) -> InstallFailure {
        let kind = match self {
            Self::DirectoryCreation { .. } => InstallErrorKind::DirectoryCreation,
            Self::Transport(error) => error.kind(),
            _ => InstallErrorKind::Filesystem,
        };
        InstallFailure {
            kind,
            message: self.to_string(),
        }
    }
}

impl Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum InstallErrorKind {
    DirectoryCreation,
    Transport,
    Filesystem,
}

/// Snapshot of a job failure kept as the orchestrator's `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InstallFailure {
    pub(crate) kind: InstallErrorKind,
    pub(crate) message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_errors_are_reported_as_filesystem_failures() {
        let error = LauncherError::Transport(TransportError::Write {
            path: PathBuf::from("/tmp/0.0.1.zip"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });

        let failure = error.install_failure();
        assert_eq!(failure.kind, InstallErrorKind::Filesystem);
        assert!(failure.message.contains("0.0.1.zip"));
    }

    #[test]
    fn stream_errors_are_reported_as_transport_failures() {
        let error = LauncherError::from(TransportError::Stream {
            bytes_received: 300,
            message: "connection reset".to_string(),
        });

        let failure = error.install_failure();
        assert_eq!(failure.kind, InstallErrorKind::Transport);
        assert_eq!(
            failure.message,
            "download stream broke after 300 bytes: connection reset"
        );
    }

    #[test]
    fn launcher_error_serializes_as_message() {
        let value = serde_json::to_value(LauncherError::InstallInProgress).unwrap();
        assert_eq!(value, serde_json::json!("an installation is already running"));
    }
}
