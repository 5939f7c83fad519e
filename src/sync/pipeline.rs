//! The sync pipeline: fetch, compare, update, commit, publish.
//!
//! One run performs at most one sync pass. The two release-list fetches are
//! the only concurrent step; everything after the comparison gate is strictly
//! sequential, each step running only after the previous succeeded. There is
//! no rollback: a failure partway leaves earlier side effects in place (a
//! written manifest, a pushed commit) for the operator to inspect.

use crate::MirrorConfig;
use crate::cli::OutputManager;
use crate::error::{FetchError, ManifestError, Result};
use crate::git::SourceControl;
use crate::github::{ReleaseHost, ReleasePayload};
use crate::manifest::{ManifestSource, write_manifest};

/// Terminal state of a successful sync pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Downstream already mirrors upstream's latest tag; nothing was touched
    UpToDate {
        /// The shared latest tag
        tag: String,
    },
    /// Manifest committed and pushed, release published downstream
    Published {
        /// The newly mirrored tag
        tag: String,
    },
}

/// Orchestrates one sync pass over the mirror's collaborators.
///
/// Generic over its seams so the pipeline's ordering contract can be tested
/// without network or a git checkout.
pub struct SyncPipeline<H, M, S> {
    config: MirrorConfig,
    host: H,
    manifest: M,
    git: S,
    output: OutputManager,
}

impl<H, M, S> SyncPipeline<H, M, S>
where
    H: ReleaseHost,
    M: ManifestSource,
    S: SourceControl,
{
    /// Create a pipeline over the given collaborators.
    pub fn new(config: MirrorConfig, host: H, manifest: M, git: S, output: OutputManager) -> Self {
        Self {
            config,
            host,
            manifest,
            git,
            output,
        }
    }

    /// Run one sync pass to a terminal state.
    ///
    /// Never writes, commits, pushes or publishes unless the upstream and
    /// downstream latest tags differ; that comparison is the sole gate of
    /// the whole system.
    pub async fn run(&self, token: &str) -> Result<SyncOutcome> {
        self.output.progress("Checking and comparing releases ...");
        let (upstream, downstream) = tokio::try_join!(
            self.host.fetch_releases(&self.config.upstream_releases_url),
            self.host.fetch_releases(&self.config.downstream_releases_url),
        )?;

        let upstream_latest = upstream.first().ok_or_else(|| FetchError::NoReleases {
            repo: "upstream".to_string(),
        })?;
        let downstream_latest = downstream.first().ok_or_else(|| FetchError::NoReleases {
            repo: "downstream".to_string(),
        })?;

        if upstream_latest.tag_name == downstream_latest.tag_name {
            self.output
                .success(&format!("Version {} is latest", downstream_latest.tag_name));
            return Ok(SyncOutcome::UpToDate {
                tag: downstream_latest.tag_name.clone(),
            });
        }

        log::info!(
            "Upstream is at {}, downstream at {}; syncing",
            upstream_latest.tag_name,
            downstream_latest.tag_name
        );

        self.output.progress(&format!(
            "Updating {} ...",
            self.config.manifest_path.display()
        ));
        let manifest = self.manifest.fetch_manifest(&self.config.manifest_url).await?;
        if manifest.is_empty() {
            return Err(ManifestError::Empty.into());
        }
        write_manifest(&self.config.manifest_path, &manifest)?;
        self.output.success(&format!(
            "{} updated successfully",
            self.config.manifest_path.display()
        ));

        self.output.progress("Pushing changes ...");
        self.git.stage_all()?;
        self.git
            .commit(&format!("Bump to {}", upstream_latest.tag_name))?;
        self.git.push()?;
        self.output.success("Changes pushed successfully");

        self.output.progress(&format!(
            "Creating release {} ...",
            upstream_latest.tag_name
        ));
        let payload = ReleasePayload::mirroring(upstream_latest);
        self.host
            .create_release(&self.config.downstream_releases_url, token, &payload)
            .await?;
        self.output.success(&format!(
            "Release {} created successfully",
            upstream_latest.tag_name
        ));

        Ok(SyncOutcome::Published {
            tag: upstream_latest.tag_name.clone(),
        })
    }
}
