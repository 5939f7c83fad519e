//! Command line interface for release_mirror.
//!
//! Wires the fixed deployment configuration to the production collaborators
//! and runs one sync pass. This module decides the exit code; no component
//! below it terminates the process.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::MirrorConfig;
use crate::error::{CliError, MirrorError, Result};
use crate::git::GitGateway;
use crate::github::GitHubClient;
use crate::manifest::RawContentFetcher;
use crate::sync::{SyncOutcome, SyncPipeline};

/// Main CLI entry point. Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let output = OutputManager::new();

    // Token check happens before any network activity.
    let token = match args.token() {
        Ok(token) => token.to_string(),
        Err(e) => return Ok(report_failure(&output, &e.into())),
    };

    let config = MirrorConfig::deployment()?;

    let http = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| CliError::ExecutionFailed {
            command: "http_client_init".to_string(),
            reason: e.to_string(),
        })?;

    let host = GitHubClient::new(http.clone(), &config.accept_header);
    let manifest = RawContentFetcher::new(http);
    let git = GitGateway::new(&config.git_binary);

    let pipeline = SyncPipeline::new(config, host, manifest, git, output.clone());

    match pipeline.run(&token).await {
        Ok(SyncOutcome::UpToDate { .. }) | Ok(SyncOutcome::Published { .. }) => Ok(0),
        Err(e) => Ok(report_failure(&output, &e)),
    }
}

/// Report a failed run with its recovery suggestions; returns the exit code.
fn report_failure(output: &OutputManager, error: &MirrorError) -> i32 {
    output.error(&format!("Sync failed: {error}"));

    let suggestions = error.recovery_suggestions();
    if !suggestions.is_empty() {
        output.println("\n💡 Recovery suggestions:");
        for suggestion in suggestions {
            output.indent(&suggestion);
        }
    }

    1
}
