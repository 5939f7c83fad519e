//! Release record shapes exchanged with the GitHub API.

use serde::{Deserialize, Serialize};

/// One release as decoded from a list-releases response.
///
/// Read-only after creation; identity is `tag_name`, an opaque comparable
/// label with no semantic-version meaning. Extra response fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Tag identifying the release
    pub tag_name: String,
    /// Release notes body
    pub body: String,
}

/// Outbound record for creating a release.
///
/// Write-only: encoded for the creation request, never decoded. `name` is
/// always set equal to `tag_name` in this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePayload {
    /// Tag for the new release
    pub tag_name: String,
    /// Display name, equal to the tag
    pub name: String,
    /// Release notes body, copied verbatim from upstream
    pub body: String,
}

impl ReleasePayload {
    /// Build the payload mirroring an upstream release.
    pub fn mirroring(release: &Release) -> Self {
        Self {
            tag_name: release.tag_name.clone(),
            name: release.tag_name.clone(),
            body: release.body.clone(),
        }
    }
}
