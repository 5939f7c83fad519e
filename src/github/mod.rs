//! GitHub release listing and creation.

mod client;
mod model;

pub use client::{GitHubClient, ReleaseHost};
pub use model::{Release, ReleasePayload};
