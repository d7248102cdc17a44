//! HTTP stage: page fetch and streamed file download.
//!
//! ## Why stream the PDF?
//!
//! Patent PDFs routinely run to hundreds of pages of scanned drawings.
//! Streaming the response body to disk in chunks keeps peak memory flat
//! regardless of file size, at no cost for the small ones.
//!
//! ## The existence short-circuit
//!
//! `download_file` returns the destination path without any network call
//! when the file already exists and the cache policy is `ReuseExisting`.
//! This is the crawl's idempotence contract: re-running a finished patent
//! performs zero downloads. Note the flip side: a changed remote PDF will
//! not refresh the local copy. That is what
//! [`crate::config::CachePolicy::Refresh`] is for.

use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::pipeline::ensure_dir;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// Filename used when the URL path has no usable basename.
const FALLBACK_FILENAME: &str = "file";

/// Build the shared HTTP client from the configured timeout and user agent.
pub fn http_client(config: &CrawlConfig) -> Result<Client, CrawlError> {
    let mut builder =
        Client::builder().timeout(std::time::Duration::from_secs(config.http_timeout_secs));
    if let Some(ref agent) = config.user_agent {
        builder = builder.user_agent(agent.clone());
    }
    builder
        .build()
        .map_err(|e| CrawlError::ClientBuildFailed(e.to_string()))
}

/// GET a page and return its body as text.
///
/// Any transport failure or non-success status is fatal — without the page
/// there is nothing to crawl.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    config: &CrawlConfig,
) -> Result<String, CrawlError> {
    info!("Fetching page: {url}");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| map_page_error(e, url, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| map_page_error(e, url, config))
}

/// Download `url` into `dest_dir`, returning the local path.
///
/// The filename is `filename` if given, else the URL's path basename, else
/// a fixed fallback. The destination directory is created as needed. When
/// the destination file already exists under `ReuseExisting`, the existing
/// path is returned and no request is made.
pub async fn download_file(
    client: &Client,
    url: &str,
    dest_dir: &Path,
    filename: Option<&str>,
    config: &CrawlConfig,
) -> Result<PathBuf, CrawlError> {
    ensure_dir(dest_dir)?;

    let name = match filename {
        Some(name) => name.to_string(),
        None => filename_from_url(url),
    };
    let dest_path = dest_dir.join(&name);

    if config.cache.reuse(&dest_path) {
        debug!("Reusing existing file: {}", dest_path.display());
        return Ok(dest_path);
    }

    info!("Downloading {url} → {}", dest_path.display());

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| map_download_error(e, url, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut file =
        tokio::fs::File::create(&dest_path)
            .await
            .map_err(|source| CrawlError::WriteFailed {
                path: dest_path.clone(),
                source,
            })?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| map_download_error(e, url, config))?;
        if chunk.is_empty() {
            continue;
        }
        file.write_all(&chunk)
            .await
            .map_err(|source| CrawlError::WriteFailed {
                path: dest_path.clone(),
                source,
            })?;
    }
    file.flush()
        .await
        .map_err(|source| CrawlError::WriteFailed {
            path: dest_path.clone(),
            source,
        })?;

    Ok(dest_path)
}

/// Derive a filename from the URL's path basename.
fn filename_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

fn map_page_error(e: reqwest::Error, url: &str, config: &CrawlConfig) -> CrawlError {
    if e.is_timeout() {
        CrawlError::RequestTimeout {
            url: url.to_string(),
            secs: config.http_timeout_secs,
        }
    } else {
        CrawlError::PageFetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

fn map_download_error(e: reqwest::Error, url: &str, config: &CrawlConfig) -> CrawlError {
    if e.is_timeout() {
        CrawlError::RequestTimeout {
            url: url.to_string(),
            secs: config.http_timeout_secs,
        }
    } else {
        CrawlError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}
