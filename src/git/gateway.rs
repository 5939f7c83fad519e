//! Gateway over the external source-control binary.
//!
//! The pipeline needs exactly three invocations per sync (stage-all, commit,
//! push), each run in the process working directory and waited on
//! synchronously. A non-zero exit from the tool is a failure, not just a
//! spawn error.

use crate::error::GitError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Source-control operations required by the sync pipeline
pub trait SourceControl {
    /// Run the tool with `args` in the current working directory, waiting
    /// for completion. Fails on spawn error or non-zero exit.
    fn run(&self, args: &[&str]) -> Result<(), GitError>;

    /// Stage all changes in the working tree.
    fn stage_all(&self) -> Result<(), GitError> {
        self.run(&["add", "."])
    }

    /// Commit staged changes with `message`.
    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message])
    }

    /// Push the current branch to its configured remote.
    fn push(&self) -> Result<(), GitError> {
        self.run(&["push"])
    }
}

/// Executes git commands at a fixed binary path
#[derive(Debug, Clone)]
pub struct GitGateway {
    binary: PathBuf,
}

impl GitGateway {
    /// Create a gateway for the git binary at `binary`.
    pub fn new(binary: impl AsRef<Path>) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
        }
    }
}

impl SourceControl for GitGateway {
    fn run(&self, args: &[&str]) -> Result<(), GitError> {
        log::debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|source| GitError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                args: args.iter().map(|a| a.to_string()).collect(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
