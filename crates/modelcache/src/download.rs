//! Streaming downloader with progress reporting.
//!
//! Fetches one resource from a network location and delivers it as a single
//! contiguous buffer. The body is consumed chunk by chunk without knowing
//! the total size in advance; progress is reported only when the transport
//! advertised a content length. Exactly one attempt is made per request —
//! retry policy belongs to the caller.

use crate::config::NetworkConfig;
use crate::error::{ModelCacheError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use tracing::{debug, info};

/// Progress callback, invoked with a percentage in `0.0..=100.0`.
pub type ProgressFn<'a> = dyn Fn(f64) + Send + Sync + 'a;

/// Fetches a resource as one contiguous buffer.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url`, reporting progress through `on_progress` when the
    /// transport advertises a total length.
    async fn download(&self, url: &str, on_progress: Option<&ProgressFn<'_>>) -> Result<Vec<u8>>;
}

/// HTTP downloader backed by a shared reqwest client.
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader with the default network configuration.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(NetworkConfig::CONNECT_TIMEOUT)
            .timeout(NetworkConfig::REQUEST_TIMEOUT)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| ModelCacheError::Config {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Create a downloader around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, on_progress: Option<&ProgressFn<'_>>) -> Result<Vec<u8>> {
        debug!("Requesting {}", url);

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| ModelCacheError::DownloadStream {
                    url: url.to_string(),
                    message: format!("request failed: {}", e),
                    source: Some(e),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelCacheError::DownloadHttp {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total = response.content_length();
        let data = collect_body(url, total, response.bytes_stream(), on_progress).await?;

        info!("Downloaded {} bytes from {}", data.len(), url);
        Ok(data)
    }
}

/// Consume a chunk stream into one contiguous buffer, reporting progress
/// after every chunk when `total` is known.
///
/// Chunks are collected first and copied once into a buffer pre-sized to
/// exactly the received length; the result never regrows. Any stream error
/// discards everything received so far.
async fn collect_body<S, E>(
    url: &str,
    total: Option<u64>,
    stream: S,
    on_progress: Option<&ProgressFn<'_>>,
) -> Result<Vec<u8>>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut received: u64 = 0;

    while let Some(next) = stream.next().await {
        let chunk = next.map_err(|e| ModelCacheError::DownloadStream {
            url: url.to_string(),
            message: format!("stream aborted after {} bytes: {}", received, e),
            source: None,
        })?;

        received += chunk.len() as u64;
        chunks.push(chunk);

        // Never report a fabricated percentage: no advertised total, no call
        if let (Some(callback), Some(total)) = (on_progress, total) {
            if total > 0 {
                callback((received as f64 / total as f64) * 100.0);
            }
        }
    }

    let mut data = Vec::with_capacity(received as usize);
    for chunk in &chunks {
        data.extend_from_slice(chunk);
    }

    Ok(data)
}
