//! Command line argument parsing and validation.
//!
//! The tool takes a single positional argument: the access token used to
//! publish releases on the downstream repository. The token is optional at
//! the clap level so a missing token surfaces as this crate's own error
//! before any network activity, rather than as a generic usage error.

use crate::error::CliError;
use clap::Parser;

/// Single-run release mirroring bot
#[derive(Parser, Debug)]
#[command(
    name = "release_mirror",
    version,
    about = "Mirror upstream releases into a downstream package repository",
    long_about = "Performs one sync pass: compares the latest upstream and downstream
release tags, and when they differ, updates the local manifest file,
commits and pushes it, and publishes a matching downstream release.

Usage:
  release_mirror <access-token>

Run from a checkout of the downstream repository with push credentials
already available to git."
)]
pub struct Args {
    /// Access token used to publish releases on the downstream repository
    #[arg(index = 1, value_name = "ACCESS_TOKEN")]
    pub access_token: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The access token, or `CliError::MissingToken` when absent.
    pub fn token(&self) -> Result<&str, CliError> {
        match self.access_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(CliError::MissingToken),
        }
    }
}
