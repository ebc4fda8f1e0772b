//! Artifact coordinate handling for modpkg
//!
//! Artifacts are identified by the conventional `group:artifact:version`
//! triple. Coordinates arrive from several places (CLI flags, modpkg.toml,
//! dependency graph nodes) and are compared case-insensitively when matched
//! against the graph, mirroring how artifact repositories treat identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::graph::DependencyNode;

/// Identity of a build artifact: group, artifact, and version.
///
/// Parsing is lenient: missing trailing segments become empty strings and
/// validity is a separate question answered by [`is_valid`]. This matches the
/// tolerant handling of user-supplied coordinates in host-application
/// configuration, where an incomplete value means "not configured" rather
/// than a hard error.
///
/// Coordinates are immutable once constructed and order deterministically,
/// which keeps exclusion sets stable across runs.
///
/// [`is_valid`]: ArtifactCoords::is_valid
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactCoords {
    /// Group identifier, e.g. `com.acme`
    pub group: String,
    /// Artifact identifier, e.g. `platform-app`
    pub artifact: String,
    /// Version string, treated as opaque
    pub version: String,
}

impl ArtifactCoords {
    /// Create coordinates from the three segments.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Whether all three segments are present and non-blank.
    ///
    /// Blank means empty or whitespace-only. Invalid coordinates are never
    /// matched against the graph.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.group.trim().is_empty()
            && !self.artifact.trim().is_empty()
            && !self.version.trim().is_empty()
    }

    /// Case-insensitive match against a dependency graph node.
    ///
    /// All three segments must match. Case-insensitivity covers repositories
    /// that normalize identifier casing differently from build files.
    #[must_use]
    pub fn matches(&self, node: &DependencyNode) -> bool {
        self.group.eq_ignore_ascii_case(&node.group)
            && self.artifact.eq_ignore_ascii_case(&node.artifact)
            && self.version.eq_ignore_ascii_case(&node.version)
    }
}

impl fmt::Display for ArtifactCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for ArtifactCoords {
    type Err = std::convert::Infallible;

    /// Parse `group:artifact:version`; missing trailing segments become empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let group = parts.next().unwrap_or_default().to_string();
        let artifact = parts.next().unwrap_or_default().to_string();
        let version = parts.next().unwrap_or_default().to_string();
        Ok(Self {
            group,
            artifact,
            version,
        })
    }
}
