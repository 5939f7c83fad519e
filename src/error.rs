//! Error types for release mirroring operations.
//!
//! Every pipeline stage reports failure through this taxonomy; nothing in the
//! system is retried, so all variants are terminal.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release_mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Main error type for all release_mirror operations
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Release list fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Manifest fetch/write errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Source-control errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Release publishing errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),
}

/// Release list fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// List-releases endpoint answered with an error status
    #[error("list-releases endpoint returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Request could not be completed
    #[error("release list request failed: {source}")]
    Request {
        /// Transport error
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not a JSON release array
    #[error("failed to decode release list: {source}")]
    Decode {
        /// Decode error
        #[source]
        source: serde_json::Error,
    },

    /// A repository exposed zero releases
    #[error("repository '{repo}' has no releases")]
    NoReleases {
        /// Which side of the mirror ("upstream" or "downstream")
        repo: String,
    },
}

/// Manifest fetch and write errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest request could not be completed
    #[error("manifest request failed: {source}")]
    Request {
        /// Transport error
        #[source]
        source: reqwest::Error,
    },

    /// Manifest body was not valid UTF-8 text
    #[error("manifest body is not valid UTF-8 text")]
    NotUtf8,

    /// Fetched manifest text was the empty string
    #[error("fetched manifest is empty")]
    Empty,

    /// Writing the local manifest file failed
    #[error("failed to write manifest to {}: {source}", .path.display())]
    Write {
        /// Target file path
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },
}

/// Source-control gateway errors
#[derive(Error, Debug)]
pub enum GitError {
    /// The source-control binary could not be spawned
    #[error("failed to spawn {}: {source}", .program.display())]
    Spawn {
        /// Binary path that failed to spawn
        program: PathBuf,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The source-control tool itself reported failure
    #[error("git {} failed{}: {stderr}", .args.join(" "), exit_label(.status))]
    CommandFailed {
        /// Arguments of the failed invocation
        args: Vec<String>,
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Captured standard error output
        stderr: String,
    },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    }
}

/// Release publishing errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// Release-creation endpoint answered with an error status
    #[error("release-creation endpoint returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Publish request could not be completed
    #[error("release-creation request failed: {source}")]
    Request {
        /// Transport error
        #[source]
        source: reqwest::Error,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// No access token argument supplied
    #[error("No access token supplied. Usage: release_mirror <access-token>")]
    MissingToken,

    /// A fixed endpoint constant is not a valid URL
    #[error("invalid endpoint '{value}': {source}")]
    InvalidEndpoint {
        /// The offending constant
        value: String,
        /// Parse error
        #[source]
        source: url::ParseError,
    },

    /// Startup-time construction of a collaborator failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Step that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl MirrorError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            MirrorError::Cli(CliError::MissingToken) => vec![
                "Pass the downstream access token as the first argument".to_string(),
                "Generate a token with 'repo' scope on the downstream repository".to_string(),
            ],
            MirrorError::Fetch(FetchError::Status { status: 403 }) => vec![
                "GitHub may be rate-limiting unauthenticated requests; wait and re-run"
                    .to_string(),
            ],
            MirrorError::Git(GitError::CommandFailed { .. }) => vec![
                "Run from a checkout of the downstream repository with a configured remote"
                    .to_string(),
                "Verify push credentials are available to git".to_string(),
            ],
            MirrorError::Publish(PublishError::Status { status: 422 }) => vec![
                "A release with this tag may already exist on the downstream repository"
                    .to_string(),
                "Delete the conflicting release or wait for the next upstream tag".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
