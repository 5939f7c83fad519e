//! Fetching and writing the mirrored manifest file.

use crate::error::ManifestError;
use std::fs;
use std::future::Future;
use std::io;
use std::path::Path;
use url::Url;

/// Source of raw manifest text
pub trait ManifestSource {
    /// Download the manifest body behind `url` as UTF-8 text.
    ///
    /// An empty body is not an error here; the pipeline gates on emptiness.
    fn fetch_manifest(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<String, ManifestError>>;
}

/// Fetches raw file content over HTTP
#[derive(Debug, Clone)]
pub struct RawContentFetcher {
    http: reqwest::Client,
}

impl RawContentFetcher {
    /// Create a fetcher over an existing HTTP connection pool.
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl ManifestSource for RawContentFetcher {
    async fn fetch_manifest(&self, url: &Url) -> Result<String, ManifestError> {
        log::info!("Downloading manifest from {url}");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ManifestError::Request { source })?;

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ManifestError::Request { source })?;

        decode_manifest(&bytes)
    }
}

/// Strict UTF-8 decode of a manifest body. Emptiness is not checked here.
fn decode_manifest(bytes: &[u8]) -> Result<String, ManifestError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| ManifestError::NotUtf8)
}

/// Atomically overwrite the manifest file at `path` with `content`.
///
/// Writes a sibling temporary file first and renames it over the target, so
/// a crash mid-write never leaves a truncated manifest in the working tree.
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    let write_err = |source: io::Error| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| write_err(io::Error::new(io::ErrorKind::InvalidInput, "not a file path")))?;

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, content).map_err(write_err)?;

    if let Err(source) = fs::rename(&tmp, path) {
        // Best effort: don't leave the temp file behind on a failed rename.
        let _ = fs::remove_file(&tmp);
        return Err(write_err(source));
    }

    log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
