use std::{path::Path, time::Duration};

use futures_util::StreamExt;
use tokio::{fs::File, io::AsyncWriteExt, time::timeout};
use url::Url;

use crate::{LauncherError, TransportError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(300);

/// Streams a remote file to disk, reporting every chunk as
/// `(chunk_bytes, total_bytes)`. `total_bytes` is 0 when the server does not
/// announce a length.
pub(crate) trait DownloadTransport {
    async fn fetch<F>(
        &self,
        url: &Url,
        destination: &Path,
        on_progress: F,
    ) -> Result<(), TransportError>
    where
        F: FnMut(u64, u64) + Send;
}

#[derive(Debug, Clone)]
pub(crate) struct HttpDownloadTransport {
    client: reqwest::Client,
}

impl HttpDownloadTransport {
    pub(crate) fn new() -> Result<Self, LauncherError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("eljuego-launcher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                LauncherError::InvalidConfig(format!("failed to build http client: {error}"))
            })?;
        Ok(Self::with_client(client))
    }

    pub(crate) fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl DownloadTransport for HttpDownloadTransport {
    async fn fetch<F>(
        &self,
        url: &Url,
        destination: &Path,
        mut on_progress: F,
    ) -> Result<(), TransportError>
    where
        F: FnMut(u64, u64) + Send,
    {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| TransportError::from_reqwest(url.as_str(), &error))?;
        let total_bytes = response.content_length().unwrap_or(0);

        let write_error = |source| TransportError::Write {
            path: destination.to_path_buf(),
            source,
        };
        let mut file = File::create(destination).await.map_err(write_error)?;
        let mut stream = response.bytes_stream();
        let mut bytes_received = 0_u64;

        loop {
            let chunk = match timeout(INACTIVITY_TIMEOUT, stream.next()).await {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(None) => break,
                Ok(Some(Err(error))) => {
                    let _ = file.flush().await;
                    return Err(TransportError::Stream {
                        bytes_received,
                        message: error.to_string(),
                    });
                }
                Err(_) => {
                    let _ = file.flush().await;
                    return Err(TransportError::Stream {
                        bytes_received,
                        message: format!(
                            "no data received for {} seconds",
                            INACTIVITY_TIMEOUT.as_secs()
                        ),
                    });
                }
            };
            if chunk.is_empty() {
                continue;
            }

            file.write_all(&chunk).await.map_err(write_error)?;
            bytes_received += chunk.len() as u64;
            on_progress(chunk.len() as u64, total_bytes);
        }

        file.flush().await.map_err(write_error)?;
        file.sync_all().await.map_err(write_error)?;
        Ok(())
    }
}
