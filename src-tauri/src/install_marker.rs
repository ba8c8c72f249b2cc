use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::DOWNLOAD_MARKER_FILE;

/// Sidecar record of the last download into a destination directory. Lets the
/// next launch tell a finished archive from one cut off mid-transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DownloadMarker {
    pub(crate) archive_file: String,
    pub(crate) total_bytes: u64,
    pub(crate) bytes_downloaded: u64,
    pub(crate) complete: bool,
    pub(crate) updated_at: String,
}

impl DownloadMarker {
    pub(crate) fn new(
        archive_path: &Path,
        total_bytes: u64,
        bytes_downloaded: u64,
        complete: bool,
    ) -> Self {
        Self {
            archive_file: archive_path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            total_bytes,
            bytes_downloaded,
            complete,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub(crate) enum ArchiveState {
    Missing,
    #[serde(rename_all = "camelCase")]
    Complete {
        bytes_on_disk: u64,
    },
    #[serde(rename_all = "camelCase")]
    Partial {
        bytes_on_disk: u64,
        expected_bytes: Option<u64>,
    },
}

pub(crate) fn marker_path(destination_dir: &Path) -> PathBuf {
    destination_dir.join(DOWNLOAD_MARKER_FILE)
}

pub(crate) fn write_marker(destination_dir: &Path, marker: &DownloadMarker) -> Result<(), String> {
    let path = marker_path(destination_dir);
    let serialized = serde_json::to_string_pretty(marker)
        .map_err(|error| format!("Failed to serialize download marker: {error}"))?;
    fs::write(&path, serialized).map_err(|error| {
        format!(
            "Failed to write download marker {}: {}",
            path.display(),
            error
        )
    })
}

fn read_marker(destination_dir: &Path) -> Option<DownloadMarker> {
    let raw = fs::read_to_string(marker_path(destination_dir)).ok()?;
    serde_json::from_str(&raw).ok()
}

pub(crate) fn inspect_archive(destination_dir: &Path, archive_path: &Path) -> ArchiveState {
    let bytes_on_disk = match fs::metadata(archive_path) {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        Ok(_) => return ArchiveState::Missing,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return ArchiveState::Missing,
        Err(_) => 0,
    };

    let archive_file = archive_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string());
    let marker = read_marker(destination_dir)
        .filter(|marker| Some(&marker.archive_file) == archive_file.as_ref());

    match marker {
        Some(marker)
            if marker.complete
                && (marker.total_bytes == 0 || bytes_on_disk == marker.total_bytes) =>
        {
            ArchiveState::Complete { bytes_on_disk }
        }
        Some(marker) => ArchiveState::Partial {
            bytes_on_disk,
            expected_bytes: (marker.total_bytes > 0).then_some(marker.total_bytes),
        },
        None => ArchiveState::Partial {
            bytes_on_disk,
            expected_bytes: None,
        },
    }
}
