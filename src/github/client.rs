//! HTTP client for the release-hosting service.
//!
//! The `ReleaseHost` trait is the seam between the sync pipeline and the
//! network; `GitHubClient` is the production implementation over reqwest.

use crate::error::{FetchError, PublishError};
use crate::github::{Release, ReleasePayload};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::future::Future;
use url::Url;

/// Operations the pipeline needs from a release-hosting service
pub trait ReleaseHost {
    /// Fetch the release list behind `url`, newest first.
    ///
    /// Only the first page is consulted; the pipeline only ever looks at the
    /// first element.
    fn fetch_releases(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<Vec<Release>, FetchError>>;

    /// Create a release on the repository behind `url`, authenticated with
    /// `token`. Single attempt; not idempotent on the remote side.
    fn create_release(
        &self,
        url: &Url,
        token: &str,
        payload: &ReleasePayload,
    ) -> impl Future<Output = Result<(), PublishError>>;
}

/// GitHub API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    accept: String,
}

impl GitHubClient {
    /// Create a client over an existing HTTP connection pool.
    ///
    /// `accept` is the vendor media type sent on every API request.
    pub fn new(http: reqwest::Client, accept: impl Into<String>) -> Self {
        Self {
            http,
            accept: accept.into(),
        }
    }
}

/// Turn a list-releases response into releases: error statuses first, then
/// the JSON array decode.
fn decode_release_list(status: u16, body: &[u8]) -> Result<Vec<Release>, FetchError> {
    if status >= 400 {
        return Err(FetchError::Status { status });
    }
    serde_json::from_slice(body).map_err(|source| FetchError::Decode { source })
}

fn check_publish_status(status: u16) -> Result<(), PublishError> {
    if status >= 400 {
        return Err(PublishError::Status { status });
    }
    Ok(())
}

impl ReleaseHost for GitHubClient {
    async fn fetch_releases(&self, url: &Url) -> Result<Vec<Release>, FetchError> {
        log::info!("Fetching releases from {url}");

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, &self.accept)
            .send()
            .await
            .map_err(|source| FetchError::Request { source })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request { source })?;

        decode_release_list(status, &body)
    }

    async fn create_release(
        &self,
        url: &Url,
        token: &str,
        payload: &ReleasePayload,
    ) -> Result<(), PublishError> {
        log::info!("Creating release {} at {url}", payload.tag_name);

        let response = self
            .http
            .post(url.clone())
            .header(ACCEPT, &self.accept)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("token {token}"))
            .json(payload)
            .send()
            .await
            .map_err(|source| PublishError::Request { source })?;

        check_publish_status(response.status().as_u16())
    }
}
