//! # Release Mirror
//!
//! Single-run bot that keeps a downstream package repository in sync with an
//! upstream repository's releases.
//!
//! Each invocation performs at most one sync pass: the latest release tags of
//! the upstream and downstream repositories are fetched concurrently and
//! compared; if they differ, the upstream manifest file is downloaded,
//! written over the local copy, committed and pushed, and a matching release
//! is published on the downstream repository.
//!
//! ## Usage
//!
//! ```bash
//! release_mirror <access-token>    # one sync pass, then exit
//! ```
//!
//! Exit status is zero when the mirror is already up to date or a release was
//! published; any pipeline failure exits non-zero. The process must run from
//! a checkout of the downstream repository with push credentials already
//! available to git.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod error;
pub mod git;
pub mod github;
pub mod manifest;
pub mod sync;

// Re-export main types for public API
pub use cli::Args;
pub use error::{CliError, FetchError, GitError, ManifestError, MirrorError, PublishError, Result};
pub use git::{GitGateway, SourceControl};
pub use github::{GitHubClient, Release, ReleaseHost, ReleasePayload};
pub use manifest::{ManifestSource, RawContentFetcher, write_manifest};
pub use sync::{SyncOutcome, SyncPipeline};

use std::path::PathBuf;
use url::Url;

const UPSTREAM_RELEASES_URL: &str = "https://api.github.com/repos/intercom/intercom-ios/releases";
const DOWNSTREAM_RELEASES_URL: &str =
    "https://api.github.com/repos/FelixHerrmann/intercom-ios/releases";
const MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/intercom/intercom-ios/master/Package.swift";
const MANIFEST_FILE: &str = "Package.swift";
const GIT_BINARY: &str = "/usr/bin/git";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Fixed deployment constants for one mirrored repository pair.
///
/// The endpoints are constants of the deployment, not runtime configuration;
/// they are collected here (rather than buried in pipeline logic) so the same
/// pipeline can be pointed at a different repository pair without touching
/// the control flow.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// List-releases endpoint of the mirrored upstream repository
    pub upstream_releases_url: Url,
    /// List-releases endpoint of the downstream mirror; also its
    /// release-creation endpoint
    pub downstream_releases_url: Url,
    /// Raw-content URL of the upstream manifest file
    pub manifest_url: Url,
    /// Tracked manifest file, relative to the working directory
    pub manifest_path: PathBuf,
    /// Path to the source-control binary
    pub git_binary: PathBuf,
    /// Vendor Accept header sent on API requests
    pub accept_header: String,
    /// User-Agent sent on every request; GitHub rejects requests without one
    pub user_agent: String,
}

impl MirrorConfig {
    /// Configuration for the deployed mirror pair.
    ///
    /// Fails if any endpoint constant is malformed, so a bad constant is a
    /// startup error rather than a mid-pipeline one.
    pub fn deployment() -> Result<Self> {
        Ok(Self {
            upstream_releases_url: parse_endpoint(UPSTREAM_RELEASES_URL)?,
            downstream_releases_url: parse_endpoint(DOWNSTREAM_RELEASES_URL)?,
            manifest_url: parse_endpoint(MANIFEST_URL)?,
            manifest_path: PathBuf::from(MANIFEST_FILE),
            git_binary: PathBuf::from(GIT_BINARY),
            accept_header: GITHUB_ACCEPT.to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        })
    }
}

fn parse_endpoint(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|source| {
        CliError::InvalidEndpoint {
            value: value.to_string(),
            source,
        }
        .into()
    })
}
