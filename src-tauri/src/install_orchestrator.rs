use std::{
    io,
    path::{Path, PathBuf},
    sync::{atomic::AtomicBool, Mutex, PoisonError},
};

use serde::Serialize;
use url::Url;

use crate::{
    append_install_log, archive_path_for, download_transport::DownloadTransport, install_marker,
    AtomicFlagGuard, InstallFailure, InstallStateMachine, InstallStatus, InstallTrigger,
    LauncherConfig, LauncherError, ProgressTracker,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InstallJob {
    pub(crate) source_url: Url,
    pub(crate) destination_dir: PathBuf,
    pub(crate) archive_path: PathBuf,
}

impl InstallJob {
    pub(crate) fn new(destination_dir: PathBuf, config: &LauncherConfig) -> Self {
        Self {
            source_url: config.download_url.clone(),
            archive_path: archive_path_for(&destination_dir, config),
            destination_dir,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub(crate) enum InstallEvent {
    #[serde(rename_all = "camelCase")]
    Started {
        destination_dir: PathBuf,
        archive_path: PathBuf,
    },
    #[serde(rename_all = "camelCase")]
    Progress {
        bytes_downloaded: u64,
        total_bytes: u64,
        percent: f64,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        archive_path: PathBuf,
        bytes_downloaded: u64,
    },
    Failed { error: InstallFailure },
}

impl InstallEvent {
    #[cfg(test)]
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InstallSnapshot {
    pub(crate) status: InstallStatus,
    pub(crate) destination_dir: Option<PathBuf>,
    pub(crate) archive_path: Option<PathBuf>,
    pub(crate) bytes_downloaded: u64,
    pub(crate) total_bytes: u64,
    pub(crate) percent: f64,
    pub(crate) last_error: Option<InstallFailure>,
}

#[derive(Debug, Default)]
struct JobRecord {
    machine: InstallStateMachine,
    job: Option<InstallJob>,
    progress: ProgressTracker,
    last_error: Option<InstallFailure>,
}

impl JobRecord {
    fn snapshot(&self) -> InstallSnapshot {
        InstallSnapshot {
            status: self.machine.status(),
            destination_dir: self.job.as_ref().map(|job| job.destination_dir.clone()),
            archive_path: self.job.as_ref().map(|job| job.archive_path.clone()),
            bytes_downloaded: self.progress.bytes_downloaded(),
            total_bytes: self.progress.total_bytes(),
            percent: self.progress.percent(),
            last_error: self.last_error.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct InstallOrchestrator {
    record: Mutex<JobRecord>,
    is_installing: AtomicBool,
}

/// Creates `path` only when it does not exist yet. Returns whether it was created.
pub(crate) async fn ensure_destination_dir(path: &Path) -> Result<bool, LauncherError> {
    let creation_error = |source| LauncherError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    };

    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => return Ok(false),
        Ok(_) => {
            return Err(creation_error(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "path exists and is not a directory",
            )));
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(creation_error(error)),
    }

    tokio::fs::create_dir_all(path)
        .await
        .map_err(creation_error)?;
    Ok(true)
}

impl InstallOrchestrator {
    fn with_record<R>(&self, f: impl FnOnce(&mut JobRecord) -> R) -> R {
        let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut record)
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> InstallStatus {
        self.with_record(|record| record.machine.status())
    }

    pub(crate) fn snapshot(&self) -> InstallSnapshot {
        self.with_record(|record| record.snapshot())
    }

    fn transition(&self, trigger: InstallTrigger) -> InstallStatus {
        self.with_record(|record| match record.machine.apply(trigger) {
            Ok(status) => status,
            Err(error) => {
                tracing::error!("{error}");
                record.machine.status()
            }
        })
    }

    /// Runs one install job to its terminal status.
    ///
    /// Every started job emits exactly one terminal event (`Completed` or
    /// `Failed`) and it is always the last one. Job failures are reported
    /// through that event and the returned snapshot; `Err` only means the job
    /// was refused because another one is running.
    pub(crate) async fn begin_install<T, E>(
        &self,
        job: InstallJob,
        transport: &T,
        mut emit: E,
    ) -> Result<InstallSnapshot, LauncherError>
    where
        T: DownloadTransport,
        E: FnMut(&InstallEvent) + Send,
    {
        let Some(_installing) = AtomicFlagGuard::try_set(&self.is_installing) else {
            append_install_log("install request ignored: another installation is running");
            return Err(LauncherError::InstallInProgress);
        };

        self.with_record(|record| {
            record.job = Some(job.clone());
            record.progress = ProgressTracker::default();
            record.last_error = None;
        });
        append_install_log(&format!(
            "install requested: {} -> {}",
            job.source_url,
            job.archive_path.display()
        ));

        match ensure_destination_dir(&job.destination_dir).await {
            Ok(true) => append_install_log(&format!(
                "created install directory {}",
                job.destination_dir.display()
            )),
            Ok(false) => {}
            Err(error) => {
                return Ok(self.fail_job(&job, InstallTrigger::SetupFailed, error, &mut emit));
            }
        }

        self.transition(InstallTrigger::Begin);
        emit(&InstallEvent::Started {
            destination_dir: job.destination_dir.clone(),
            archive_path: job.archive_path.clone(),
        });
        self.write_marker(&job, false);

        let result = transport
            .fetch(&job.source_url, &job.archive_path, |chunk_bytes, total_bytes| {
                let (event, total_captured) = self.with_record(|record| {
                    let had_total = record.progress.total_bytes() > 0;
                    record.progress.record_chunk(chunk_bytes, total_bytes);
                    let event = InstallEvent::Progress {
                        bytes_downloaded: record.progress.bytes_downloaded(),
                        total_bytes: record.progress.total_bytes(),
                        percent: record.progress.percent(),
                    };
                    (event, !had_total && record.progress.total_bytes() > 0)
                });
                // Expected size goes to disk as soon as it is known.
                if total_captured {
                    self.write_marker(&job, false);
                }
                emit(&event);
            })
            .await;

        match result {
            Ok(()) => {
                self.transition(InstallTrigger::StreamCompleted);
                self.write_marker(&job, true);
                let snapshot = self.snapshot();
                append_install_log(&format!(
                    "download finished: {} bytes at {}",
                    snapshot.bytes_downloaded,
                    job.archive_path.display()
                ));
                emit(&InstallEvent::Completed {
                    archive_path: job.archive_path.clone(),
                    bytes_downloaded: snapshot.bytes_downloaded,
                });
                Ok(snapshot)
            }
            Err(error) => {
                self.write_marker(&job, false);
                Ok(self.fail_job(
                    &job,
                    InstallTrigger::StreamFailed,
                    LauncherError::from(error),
                    &mut emit,
                ))
            }
        }
    }

    fn fail_job<E>(
        &self,
        job: &InstallJob,
        trigger: InstallTrigger,
        error: LauncherError,
        emit: &mut E,
    ) -> InstallSnapshot
    where
        E: FnMut(&InstallEvent),
    {
        tracing::error!(
            destination = %job.destination_dir.display(),
            "install failed: {error}"
        );
        let failure = error.install_failure();
        self.transition(trigger);
        let snapshot = self.with_record(|record| {
            record.last_error = Some(failure.clone());
            record.snapshot()
        });
        emit(&InstallEvent::Failed { error: failure });
        snapshot
    }

    fn write_marker(&self, job: &InstallJob, complete: bool) {
        let (total_bytes, bytes_downloaded) = self.with_record(|record| {
            (
                record.progress.total_bytes(),
                record.progress.bytes_downloaded(),
            )
        });
        let marker = install_marker::DownloadMarker::new(
            &job.archive_path,
            total_bytes,
            bytes_downloaded,
            complete,
        );
        if let Err(error) = install_marker::write_marker(&job.destination_dir, &marker) {
            tracing::warn!("{error}");
        }
    }
}
